//! Minimal HTTP/1.1 request/response framing: just enough to carry a JSON
//! body over a plain TCP socket. No keep-alive, no chunked transfer
//! encoding, no compression — every request is one message, one response,
//! `Content-Length` framed.

use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

fn header(headers: &[(String, String)], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.clone())
}

fn read_header_lines<R: BufRead>(reader: &mut R) -> Result<(Vec<(String, String)>, usize)> {
    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            bail!("connection closed while reading headers");
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_string();
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }
    Ok((headers, content_length))
}

pub fn read_request<R: BufRead>(reader: &mut R) -> Result<HttpRequest> {
    let mut request_line = String::new();
    let n = reader.read_line(&mut request_line).context("reading request line")?;
    if n == 0 {
        bail!("connection closed before a request line arrived");
    }
    let mut parts = request_line.trim_end().splitn(3, ' ');
    let method = parts.next().ok_or_else(|| anyhow!("malformed request line"))?.to_string();
    let path = parts.next().ok_or_else(|| anyhow!("malformed request line"))?.to_string();

    let (headers, content_length) = read_header_lines(reader)?;
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).context("reading request body")?;

    Ok(HttpRequest { method, path, headers, body })
}

pub fn write_request<W: Write>(writer: &mut W, req: &HttpRequest) -> Result<()> {
    write!(writer, "{} {} HTTP/1.1\r\n", req.method, req.path)?;
    for (name, value) in &req.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        write!(writer, "{name}: {value}\r\n")?;
    }
    write!(writer, "content-length: {}\r\n", req.body.len())?;
    write!(writer, "\r\n")?;
    writer.write_all(&req.body)?;
    writer.flush()?;
    Ok(())
}

pub fn read_response<R: BufRead>(reader: &mut R) -> Result<HttpResponse> {
    let mut status_line = String::new();
    let n = reader.read_line(&mut status_line).context("reading status line")?;
    if n == 0 {
        bail!("connection closed before a status line arrived");
    }
    let mut parts = status_line.trim_end().splitn(3, ' ');
    let _version = parts.next();
    let status: u16 = parts
        .next()
        .ok_or_else(|| anyhow!("malformed status line"))?
        .parse()
        .context("status code is not a number")?;
    let reason = parts.next().unwrap_or("").to_string();

    let (headers, content_length) = read_header_lines(reader)?;
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).context("reading response body")?;

    Ok(HttpResponse { status, reason, headers, body })
}

pub fn write_response<W: Write>(writer: &mut W, resp: &HttpResponse) -> Result<()> {
    write!(writer, "HTTP/1.1 {} {}\r\n", resp.status, resp.reason)?;
    for (name, value) in &resp.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        write!(writer, "{name}: {value}\r\n")?;
    }
    write!(writer, "content-length: {}\r\n", resp.body.len())?;
    write!(writer, "\r\n")?;
    writer.write_all(&resp.body)?;
    writer.flush()?;
    Ok(())
}

pub fn json_request<T: Serialize>(method: &str, path: &str, body: &T) -> Result<HttpRequest> {
    let bytes = serde_json::to_vec(body)?;
    Ok(HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: bytes,
    })
}

pub fn empty_request(method: &str, path: &str) -> HttpRequest {
    HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        headers: Vec::new(),
        body: Vec::new(),
    }
}

pub fn json_response<T: Serialize>(status: u16, reason: &str, body: &T) -> Result<HttpResponse> {
    let bytes = serde_json::to_vec(body)?;
    Ok(HttpResponse {
        status,
        reason: reason.to_string(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: bytes,
    })
}

pub fn parse_json_body<T: DeserializeOwned>(resp: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&resp.body).context("parsing JSON body")
}

pub fn parse_json_request_body<T: DeserializeOwned>(req: &HttpRequest) -> Result<T> {
    serde_json::from_slice(&req.body).context("parsing JSON body")
}

pub fn content_type(resp: &HttpResponse) -> Option<String> {
    header(&resp.headers, "content-type")
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;

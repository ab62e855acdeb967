//! A deliberately minimal raw-socket HTTP client for talking to a running
//! `snapfindd`: just enough to drive `status`/`stop`/`restart` without
//! reaching for a full HTTP client crate the daemon itself doesn't use
//! either.

use std::io::BufReader;
use std::net::TcpStream;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use snapfind_protocol::codec::{self, HttpResponse};

pub struct DaemonClient {
    host: String,
    port: u16,
}

impl DaemonClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    fn connect(&self) -> Result<TcpStream> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .with_context(|| format!("connecting to snapfindd at {}:{}", self.host, self.port))?;
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;
        stream.set_write_timeout(Some(Duration::from_secs(5)))?;
        Ok(stream)
    }

    fn roundtrip(&self, req: &codec::HttpRequest) -> Result<HttpResponse> {
        let mut stream = self.connect()?;
        codec::write_request(&mut stream, req).context("writing request")?;
        let mut reader = BufReader::new(stream);
        codec::read_response(&mut reader).context("reading response")
    }

    pub fn get(&self, path: &str) -> Result<HttpResponse> {
        self.roundtrip(&codec::empty_request("GET", path))
    }

    pub fn post_empty(&self, path: &str) -> Result<HttpResponse> {
        self.roundtrip(&codec::empty_request("POST", path))
    }

    pub fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        let req = codec::json_request("POST", path, body)?;
        self.roundtrip(&req)
    }
}

pub fn expect_json<T: DeserializeOwned>(resp: &HttpResponse) -> Result<T> {
    if resp.status >= 400 {
        bail!("daemon replied {} {}", resp.status, resp.reason);
    }
    codec::parse_json_body(resp)
}

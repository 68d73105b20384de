//! `claudeload fetch`

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use claudeload_core::{FetchSlot, RequestInit};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use tokio::io::AsyncWriteExt;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Target URL.
    pub url: String,

    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Extra header as `Name: value`; repeatable.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(short = 'd', long)]
    pub data: Option<String>,
}

/// Send the request through `slot` and stream the body to stdout
pub async fn run(slot: &FetchSlot, args: FetchArgs) -> Result<()> {
    let init = build_init(&args)?;
    let mut response = slot
        .fetch(args.url.as_str(), init)
        .await
        .with_context(|| format!("fetch {} failed", args.url))?;

    let status = response.status();
    if !status.is_success() {
        eprintln!("[!] {} returned {}", args.url, status);
    }

    let mut stdout = tokio::io::stdout();
    while let Some(chunk) = response.chunk().await? {
        stdout.write_all(&chunk).await?;
        stdout.flush().await?;
    }

    Ok(())
}

fn build_init(args: &FetchArgs) -> Result<RequestInit> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .with_context(|| format!("invalid method: {}", args.method))?;

    let mut init = RequestInit::new().method(method);
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        init = init.header(name, value);
    }
    if let Some(data) = &args.data {
        init = init.body(data.as_str());
    }
    Ok(init)
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("header must look like 'Name: value': {raw}");
    };
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| anyhow!("invalid header name in {raw:?}: {e}"))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|e| anyhow!("invalid header value in {raw:?}: {e}"))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(method: &str, headers: &[&str], data: Option<&str>) -> FetchArgs {
        FetchArgs {
            url: "https://api.anthropic.com/v1/messages".to_string(),
            method: method.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            data: data.map(str::to_string),
        }
    }

    #[test]
    fn test_build_init() {
        let init = build_init(&args(
            "post",
            &["content-type: application/json", "x-api-key:abc"],
            Some("{}"),
        ))
        .unwrap();

        assert_eq!(init.method, Some(Method::POST));
        assert_eq!(init.headers["content-type"], "application/json");
        assert_eq!(init.headers["x-api-key"], "abc");
        assert_eq!(init.body.as_ref().and_then(|b| b.as_text()), Some("{}"));
    }

    #[test]
    fn test_rejects_malformed_headers() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header("bad name: x").is_err());
        assert!(build_init(&args("GET", &["nope"], None)).is_err());
    }
}

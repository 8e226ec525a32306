use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow, bail};
use page_handler::PageKind;
use url::Url;

pub const USAGE: &str = "usage: mediconecta <page.html> [site|login|patient] \
                         [--url <location>] [--cookie <cookies>] [--load <path> <selector>]";

/// A `--load` request: fetch `path` and put the answer in `selector`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub path: String,
    pub selector: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    pub page: PathBuf,
    pub kind: PageKind,
    pub location: Option<Url>,
    pub cookie: Option<String>,
    pub loads: Vec<LoadRequest>,
}

impl Args {
    /// Parse the arguments that follow the program name.
    ///
    /// # Errors
    /// Returns an error for missing or malformed arguments.
    pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let page = args.next().map(PathBuf::from).ok_or_else(|| anyhow!(USAGE))?;
        let mut parsed = Self {
            page,
            kind: PageKind::default(),
            location: None,
            cookie: None,
            loads: Vec::new(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" => {
                    let raw = args.next().ok_or_else(|| anyhow!("--url needs a value"))?;
                    parsed.location = Some(Url::parse(&raw).with_context(|| format!("invalid --url {raw:?}"))?);
                }
                "--cookie" => {
                    parsed.cookie = Some(args.next().ok_or_else(|| anyhow!("--cookie needs a value"))?);
                }
                "--load" => {
                    let (Some(path), Some(selector)) = (args.next(), args.next()) else {
                        bail!("--load needs a path and a selector");
                    };
                    parsed.loads.push(LoadRequest { path, selector });
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
                kind => parsed.kind = kind.parse()?,
            }
        }

        if !parsed.loads.is_empty() && parsed.location.is_none() {
            bail!("--load needs --url to resolve against");
        }
        Ok(parsed)
    }
}

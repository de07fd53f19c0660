//! `cadence resolve`: run one internal-scheme request through the router.

use std::path::Path;

use anyhow::{Context, Result};
use cadence_config::Config;
use cadence_protocol::{ResourceRequest, SymlinkPolicy, guard};
use http::Method;
use http::header::CONTENT_TYPE;

use crate::config_bridge;
use crate::theme;

/// Options for [`run_resolve`].
pub(crate) struct ResolveArgs<'a> {
    pub(crate) uri: &'a str,
    pub(crate) method: &'a str,
    pub(crate) install_dir: Option<&'a Path>,
    pub(crate) strict_symlinks: bool,
    pub(crate) show_body: bool,
}

/// Resolve `args.uri` and print the decision and the response.
pub(crate) async fn run_resolve(cfg: &Config, args: ResolveArgs<'_>) -> Result<()> {
    let install_dir = match args.install_dir {
        Some(dir) => dir.to_path_buf(),
        None => config_bridge::install_dir(cfg)?,
    };
    let policy = if args.strict_symlinks {
        SymlinkPolicy::Canonicalize
    } else {
        SymlinkPolicy::Lexical
    };
    let registry = config_bridge::to_registry(cfg, &install_dir, policy)?;

    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid method '{}'", args.method))?;
    let req = ResourceRequest::from_uri(&cfg.protocol.scheme, method, args.uri)?;

    println!("{}", theme::title("Request"));
    println!("{}", theme::field("method", req.method.as_str()));
    println!("{}", theme::field("host", &req.host));
    println!("{}", theme::field("path", &req.pathname));

    if let Some(router) = registry.router() {
        let resolved = router.resolver().resolve(&req.host, &req.pathname);
        println!("{}", theme::field("candidate", &resolved.candidate));
        match resolved.root {
            Some((spec, root)) => {
                println!("{}", theme::field("root", &format!("{spec} ({})", root.display())));
                match guard::check(root, &resolved.candidate) {
                    guard::SandboxDecision::Allowed(path) => {
                        println!("{}", theme::field("file", &path.display().to_string()));
                    },
                    guard::SandboxDecision::Denied(reason) => {
                        println!("{}", theme::field("denied", &reason.to_string()));
                    },
                }
            },
            None => println!("{}", theme::field("root", "none")),
        }
    }

    let response = registry.handle(&req).await;
    let status = response.status();

    println!("{}", theme::rule());
    println!("{}", theme::line(theme::status_tone(status), &status.to_string()));
    if let Some(ct) = response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        println!("{}", theme::field("type", ct));
    }
    println!("{}", theme::field("bytes", &response.body().len().to_string()));

    if args.show_body {
        println!("{}", String::from_utf8_lossy(response.body()));
    }
    Ok(())
}

//! `wikifeed render`: one feed through the same service the server uses.
//!
//! The cache is honoured, so repeated renders within the update interval
//! return the stored document.

use super::args::RenderArgs;
use crate::config::SiteConfig;
use crate::feed::{FeedRequest, FeedService, Params};
use crate::log;
use crate::utils::date::now_unix;
use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{Write, stdout};
use std::sync::Arc;

pub fn render(args: &RenderArgs, config: Arc<SiteConfig>) -> Result<()> {
    let service = FeedService::open(config)?;
    let request = FeedRequest {
        user: args.user.clone(),
        host: args.host.clone(),
        port: args.port,
        ..FeedRequest::new(Params::from_query(&args.query))
    };

    let response = service.handle(&request, now_unix());
    if response.status != 200 {
        bail!("feed request failed ({}): {}", response.status, response.body);
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &response.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("render"; "{}", path.display());
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(response.body.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    fn site(dir: &std::path::Path) -> Arc<SiteConfig> {
        let data = dir.join("data");
        fs::create_dir_all(data.join("pages/ns")).unwrap();
        fs::write(data.join("pages/ns/start.txt"), "# Start\n\nWelcome.\n").unwrap();
        fs::write(
            data.join("changes.log"),
            "{\"date\":1718461845,\"id\":\"ns:start\",\"type\":\"create\",\"user\":\"alice\"}\n",
        )
        .unwrap();

        let path = dir.join("wikifeed.toml");
        fs::write(
            &path,
            "[site]\ntitle = \"Render Wiki\"\nurl = \"https://wiki.example.com/\"\n",
        )
        .unwrap();
        Arc::new(SiteConfig::load(&path, &Overrides::default()).unwrap())
    }

    fn args(query: &str, output: Option<std::path::PathBuf>) -> RenderArgs {
        RenderArgs {
            query: query.into(),
            user: None,
            host: "localhost".into(),
            port: 80,
            output,
            verbose: false,
        }
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = site(dir.path());
        let out = dir.path().join("feed.xml");

        render(&args("type=atom1", Some(out.clone())), config).unwrap();
        let xml = fs::read_to_string(&out).unwrap();
        assert!(xml.contains("Render Wiki"));
        assert!(xml.contains("doku.php?id=ns:start"));
        assert!(dir.path().join(".cache/feed").is_dir());
    }

    #[test]
    fn test_render_disabled_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = (*site(dir.path())).clone();
        config.feed.enable = false;

        let err = render(&args("", None), Arc::new(config)).unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}

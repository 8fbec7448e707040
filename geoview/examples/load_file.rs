//! Loads a single file and prints the resulting status, file summary and map view.
//!
//! ```text
//! cargo run --example load_file -- <url-or-path> [type] [config.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::{bail, Context};
    use geoview::platform::HttpLoader;
    use geoview::status::LogReporter;
    use geoview::{LoadRequest, Viewer, ViewerConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: load_file <url-or-path> [type] [config.json]");
    };
    let file_type = args.next().unwrap_or_default();
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read configuration {path}"))?;
            ViewerConfig::from_json(&json)?
        }
        None => ViewerConfig::default(),
    };

    let locale = config.locale;
    let loader = HttpLoader::with_user_agent(&config.user_agent);
    let viewer = Viewer::new(config, Arc::new(loader), Arc::new(LogReporter));

    viewer.dispatch(LoadRequest::new(url, &file_type)).await;

    println!("{}", viewer.status());
    if let Some(info) = viewer.file_info() {
        println!("{}", info.to_html(locale));
    }

    let view = viewer.view();
    println!(
        "view: center {:?}, zoom {}, visible {:?}",
        view.center(),
        view.zoom(),
        view.visible_bounds()
    );

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

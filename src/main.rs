use certforge::config::Config;
use certforge::render::Renderer;
use certforge::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certforge=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(Config::from_env());

    let renderer = Renderer::from_config(&config)?;
    let (width, height) = renderer.canvas_size();
    tracing::info!(
        "Template {} loaded, rendering at {}x{}",
        config.template_image.display(),
        width,
        height
    );

    let state = AppState {
        renderer: Arc::new(renderer),
        config: config.clone(),
    };
    let app = certforge::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Certforge listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

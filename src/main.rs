use caption_forge::{
    generate_captions, read_image_data_uri, share_link, GatewayConfig, GeminiGateway,
    DEFAULT_PROMPT,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "caption-forge", about = "Generate social-media captions for an image")]
struct Cli {
    #[arg(value_name = "IMAGE", index = 1)]
    image: PathBuf,

    /// Prompt sent with the image
    #[arg(short, long)]
    prompt: Option<String>,

    /// Gemini model (overrides GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Print the unparsed model response as well
    #[arg(long)]
    raw: bool,

    /// Print a WhatsApp share link under each caption
    #[arg(long)]
    share: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GatewayConfig::from_env();
    if let Some(model) = cli.model {
        config = config.model(model);
    }
    let gateway = GeminiGateway::new(reqwest::Client::new(), config);

    let image = read_image_data_uri(&cli.image)?;
    let prompt = cli.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);

    log::info!("Captioning {}...", cli.image.display());

    let session = match generate_captions(&gateway, &image, prompt).await {
        Ok(session) => session,
        Err(e) => {
            log::error!("Caption request failed: {}", e);
            eprintln!("Error: {}", e.public_message());
            std::process::exit(1);
        }
    };

    if cli.raw {
        println!("--- raw response ---\n{}\n--------------------", session.raw());
    }

    println!("Captions ({}):", session.options().len());
    for caption in session.options() {
        println!("  - {}", caption);
        if cli.share {
            println!("    {}", share_link(caption));
        }
    }

    Ok(())
}

//! Book generation command handler.

use super::commands::GenerateArgs;
use super::output::{emit, read_file, to_json};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fablewright::{
    BookRequest, FablewrightConfig, FablewrightResult, IllustratedBookOrchestrator, ImageInput,
    ProviderManager,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// MIME type for a photo file, from its extension.
fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Photo argument as an image input: URLs pass through, files are inlined.
pub fn photo_input(photo: &str) -> FablewrightResult<ImageInput> {
    if photo.starts_with("http://") || photo.starts_with("https://") || photo.starts_with("data:")
    {
        return Ok(ImageInput::Url(photo.to_string()));
    }
    let path = Path::new(photo);
    let bytes = read_file(path)?;
    Ok(ImageInput::Base64 {
        mime_type: mime_type_for(path).to_string(),
        data: STANDARD.encode(bytes),
    })
}

/// Build the book request for the parsed arguments.
pub fn book_request(args: &GenerateArgs) -> FablewrightResult<BookRequest> {
    let photo = args.photo.as_deref().map(photo_input).transpose()?;
    Ok(BookRequest {
        story: args.story.request(),
        child: args.identity(),
        photo,
        style_overrides: args.overrides(),
        image_size: args.size,
    })
}

/// Generate a complete illustrated book and emit it as JSON.
#[instrument(skip_all, fields(theme = %args.story.theme))]
pub async fn generate_book(
    args: GenerateArgs,
    config: &FablewrightConfig,
) -> FablewrightResult<()> {
    let request = book_request(&args)?;

    let manager = ProviderManager::from_config(config);
    for (channel, descriptor) in manager.describe() {
        info!(
            %channel,
            provider = descriptor.name(),
            available = descriptor.available(),
            "Provider configured"
        );
    }

    let orchestrator = IllustratedBookOrchestrator::new(Arc::new(manager));
    let book = orchestrator.generate_illustrated_book(&request).await?;

    info!(
        pages = book.book_pages.len(),
        scenes = book.scenes.len(),
        "Book generated"
    );
    emit(&to_json(&book)?, args.output.as_deref())
}

use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{
    EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource,
};

use crate::pagination::RenderedPage;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x07_E3_80;

/// Convert a rendered page into a transport embed.
pub fn rendered_page_embed(page: &RenderedPage) -> anyhow::Result<Embed> {
    let mut builder = EmbedBuilder::new().title(&page.title).color(page.color);

    if let Some(description) = &page.description {
        builder = builder.description(description);
    }

    if let Some(thumbnail) = &page.thumbnail {
        builder = builder.thumbnail(ImageSource::url(thumbnail)?);
    }

    for field in &page.fields {
        let field_builder = EmbedFieldBuilder::new(&field.name, &field.value);
        builder = if field.inline {
            builder.field(field_builder.inline())
        } else {
            builder.field(field_builder)
        };
    }

    let footer = EmbedFooterBuilder::new(&page.footer).build();
    Ok(builder.footer(footer).validate()?.build())
}

/// Build a plain titled notice embed in the standard color.
pub fn notice_embed(title: &str, description: impl Into<String>) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .validate()?
        .build();

    Ok(embed)
}

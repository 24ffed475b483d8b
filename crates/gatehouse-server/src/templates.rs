use anyhow::{anyhow, Context};
use rust_embed::Embed;
use tera::Tera;

#[derive(Embed)]
#[folder = "templates/"]
struct TemplateAssets;

/// Load every embedded template into a fresh `Tera`. `.html` files are
/// autoescaped.
pub fn load() -> anyhow::Result<Tera> {
    let mut sources = Vec::new();
    for name in <TemplateAssets as Embed>::iter() {
        let file = <TemplateAssets as Embed>::get(&name)
            .ok_or_else(|| anyhow!("embedded template vanished: {name}"))?;
        let source = String::from_utf8(file.data.into_owned())
            .with_context(|| format!("template {name} is not UTF-8"))?;
        sources.push((name.into_owned(), source));
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(sources)
        .context("failed to parse page templates")?;
    Ok(tera)
}

//! slug-to-uuid - resolve nimble URL slugs to resource IDs
//!
//! Accepts a slug (`kobold-warrior-<identifier>`), a bare identifier, or a
//! legacy UUID and prints the UUID it names. With `--slug <NAME>` the
//! resolved ID is turned back into a slug for that display name.

use anyhow::{Context, Result};
use clap::Parser;
use nimble_id::{decode_identifier, identifier_suffix, resolve_slug, Identifier, ResourceId, Slug};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;

#[derive(Debug, Parser)]
#[command(name = "slug-to-uuid", version, about = "Resolve a slug or identifier to a UUID")]
struct Cli {
    /// Slug, 26-character identifier, or UUID.
    input: String,

    /// Build the slug for this display name instead of printing the UUID.
    #[arg(long, value_name = "NAME")]
    slug: Option<String>,

    /// Print JSON.
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "NIMBLE_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn resolve(input: &str) -> Result<ResourceId> {
    let input = input.trim();
    if let Some(id) = resolve_slug(input) {
        debug!(%id, input, "Resolved slug");
        return Ok(id);
    }

    // Resolution is silent; decode again to say what was wrong.
    match decode_identifier(identifier_suffix(input)) {
        Err(e) => Err(e).with_context(|| format!("could not resolve '{input}'")),
        Ok(_) => anyhow::bail!("could not resolve '{input}'"),
    }
}

fn render(cli: &Cli, id: ResourceId) -> Result<String> {
    let slug = cli.slug.as_deref().map(|name| Slug::new(name, id));

    if cli.json {
        let mut out = json!({
            "id": id,
            "identifier": Identifier::encode(id),
        });
        if let Some(slug) = slug {
            out["slug"] = json!(slug);
        }
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    Ok(match slug {
        Some(slug) => slug.into_string(),
        None => id.to_string(),
    })
}

fn run(cli: &Cli) -> Result<()> {
    let id = resolve(&cli.input)?;
    println!("{}", render(cli, id)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Prefer RUST_LOG, fall back to NIMBLE_LOG_LEVEL. Stdout carries the result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        error::print_error(&e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use nimble_id::IdError;

    const UUID: &str = "550e8400-e29b-41d4-a716-446655440000";
    const IDENTIFIER: &str = "2n1t201rmv87aae5j4csam8000";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("slug-to-uuid").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_slug() {
        let id = resolve(&format!("kobold-warrior-{IDENTIFIER}")).unwrap();
        assert_eq!(id.to_string(), UUID);
    }

    #[test]
    fn test_resolve_legacy_uuid() {
        assert_eq!(resolve(UUID).unwrap().to_string(), UUID);
        assert_eq!(resolve(&format!("  {UUID}\n")).unwrap().to_string(), UUID);
    }

    #[test]
    fn test_resolve_failure_carries_cause() {
        let err = resolve("kobold").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IdError>(),
            Some(IdError::InvalidLength { .. })
        ));
        assert!(err.to_string().contains("kobold"));
    }

    #[test]
    fn test_render_plain() {
        let id = resolve(IDENTIFIER).unwrap();
        assert_eq!(render(&cli(&[IDENTIFIER]), id).unwrap(), UUID);
    }

    #[test]
    fn test_render_slug() {
        let id = resolve(UUID).unwrap();
        let out = render(&cli(&[UUID, "--slug", "Kobold Warrior"]), id).unwrap();
        assert_eq!(out, format!("kobold-warrior-{IDENTIFIER}"));
    }

    #[test]
    fn test_render_json() {
        let id = resolve(UUID).unwrap();
        let out = render(&cli(&[UUID, "--json", "--slug", "Goblin"]), id).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["id"], UUID);
        assert_eq!(value["identifier"], IDENTIFIER);
        assert_eq!(value["slug"], format!("goblin-{IDENTIFIER}"));
    }
}

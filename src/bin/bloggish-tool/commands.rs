use std::fs;

use anyhow::{Context, Result};
use serde_json::Value;

use bloggish::legacy::split_template_from_html;
use bloggish::post::{resolve_post, PostRecord};
use bloggish::template::header_renderer::render_header_html;
use bloggish::template::normalizer::normalize;

use crate::{MigrateArgs, RenderHeaderArgs, ResolveArgs, SplitArgs};

#[derive(Debug)]
pub(crate) enum Migration {
    /// The record already has template data
    Structured,
    /// No header block at the top of the content
    NoHeader,
    Migrated(PostRecord),
}

/// Moves the header block of a legacy record into `template_data`, leaving the rest as `content`.
pub(crate) fn migrate_record(post: &PostRecord) -> Result<Migration> {
    if post.has_template_data() {
        return Ok(Migration::Structured);
    }

    let split = split_template_from_html(&post.content, &post.created_at);
    if !split.found {
        return Ok(Migration::NoHeader);
    }

    let mut migrated = post.clone();
    migrated.template_data = Some(serde_json::to_value(&split.template)?);
    migrated.content = split.body;
    Ok(Migration::Migrated(migrated))
}

pub(crate) fn resolve_cmd(args: ResolveArgs) -> Result<()> {
    let post = PostRecord::from_file(&args.post)?;
    let resolved = resolve_post(&post);
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

pub(crate) fn split_cmd(args: SplitArgs) -> Result<()> {
    let html = fs::read_to_string(&args.html)
        .with_context(|| format!("Error reading {}", args.html.display()))?;
    let split = split_template_from_html(&html, &args.created_at);
    println!("{}", serde_json::to_string_pretty(&split)?);
    Ok(())
}

pub(crate) fn migrate_cmd(args: MigrateArgs) -> Result<()> {
    let post = PostRecord::from_file(&args.post)?;

    let migrated = match migrate_record(&post)? {
        Migration::Structured => {
            eprintln!("Post {} already has template data, nothing to do", post.id);
            return Ok(());
        }
        Migration::NoHeader => {
            eprintln!("Post {} has no legacy header block, nothing to do", post.id);
            return Ok(());
        }
        Migration::Migrated(migrated) => migrated,
    };

    let output = serde_json::to_string_pretty(&migrated)?;
    if args.in_place {
        fs::write(&args.post, output + "\n")
            .with_context(|| format!("Error writing {}", args.post.display()))?;
        eprintln!("Migrated post {}", migrated.id);
    } else {
        println!("{}", output);
    }

    Ok(())
}

pub(crate) fn render_header_cmd(args: RenderHeaderArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.template)
        .with_context(|| format!("Error reading {}", args.template.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid template data in {}", args.template.display()))?;

    let template = normalize(Some(&value), &args.created_at);
    print!("{}", render_header_html(&template));
    Ok(())
}

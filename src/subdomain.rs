use crate::config::SiteConfig;

/// Returns the blog owner addressed by a `<username>.<base_domain>` host.
///
/// The port is ignored. The bare domain, nested subdomains and reserved names (`www` and friends)
/// do not address a blog.
pub fn tenant_from_host(host: &str, site: &SiteConfig) -> Option<String> {
    let host = host.split(':').next()?.trim().trim_end_matches('.').to_ascii_lowercase();
    let suffix = format!(".{}", site.base_domain.to_ascii_lowercase());

    let subdomain = host.strip_suffix(&suffix)?;
    if subdomain.is_empty() || subdomain.contains('.') {
        return None;
    }
    if site.reserved_subdomains.iter().any(|r| r.eq_ignore_ascii_case(subdomain)) {
        return None;
    }

    Some(subdomain.to_string())
}

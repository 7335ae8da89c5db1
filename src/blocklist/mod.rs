pub mod presets;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

const TITLE_SEPARATORS: [&str; 4] = [" - ", " | ", " / ", " -- "];

/// Variations this short ("yt", "fb", "ig") only match the exact title
/// or an end-of-title segment.
const SHORT_NAME_MAX_LEN: usize = 3;

/// The set of URLs and apps treated as distractions during a session.
///
/// Combines preset categories and quick-toggle sites with custom user
/// additions. Custom URLs and app names are stored separately so each
/// can be validated on entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Blocklist {
    pub enabled_categories: BTreeSet<String>,
    pub enabled_quick_sites: BTreeSet<String>,
    pub enabled_gadgets: BTreeSet<String>,
    pub custom_urls: Vec<String>,
    pub custom_apps: Vec<String>,
}

impl Default for Blocklist {
    fn default() -> Self {
        let mut blocklist = Self {
            enabled_categories: BTreeSet::new(),
            enabled_quick_sites: BTreeSet::new(),
            enabled_gadgets: BTreeSet::new(),
            custom_urls: Vec::new(),
            custom_apps: Vec::new(),
        };
        blocklist.normalize();
        blocklist
    }
}

impl Blocklist {
    /// Fills empty selection sets with their defaults. Called after
    /// deserializing a settings file so a missing or blanked-out field
    /// falls back to sensible blocking instead of none at all.
    pub fn normalize(&mut self) {
        if self.enabled_categories.is_empty() {
            self.enabled_categories = presets::PRESET_CATEGORIES
                .iter()
                .filter(|c| c.default_enabled)
                .map(|c| c.id.to_string())
                .collect();
        }
        if self.enabled_quick_sites.is_empty() {
            self.enabled_quick_sites = presets::QUICK_SITES
                .iter()
                .map(|s| s.id.to_string())
                .collect();
        }
        if self.enabled_gadgets.is_empty() {
            self.enabled_gadgets = presets::DEFAULT_ENABLED_GADGETS
                .iter()
                .map(|g| g.to_string())
                .collect();
        }
    }

    /// All active blocking patterns: enabled categories, enabled quick
    /// sites, then custom URLs and apps.
    pub fn all_patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = Vec::new();
        for cat_id in &self.enabled_categories {
            if let Some(category) = presets::category(cat_id) {
                patterns.extend(category.patterns.iter().copied());
            }
        }
        for site_id in &self.enabled_quick_sites {
            if let Some(site) = presets::quick_site(site_id) {
                patterns.extend(site.patterns.iter().copied());
            }
        }
        patterns.extend(self.custom_urls.iter().map(String::as_str));
        patterns.extend(self.custom_apps.iter().map(String::as_str));
        patterns
    }

    /// Checks the current screen content against every active pattern.
    ///
    /// Matching rules:
    /// - Patterns containing a dot are matched as domains with boundary
    ///   checks, so "x.com" matches "x.com" and "www.x.com" but never
    ///   "netflix.com". Patterns starting with "://" or "/" are matched
    ///   as exact substrings.
    /// - Patterns without a dot are app names, matched as substrings of
    ///   the window title, app name, and page title.
    /// - The page title is only consulted for domain patterns when no
    ///   URL is available, and then only in structural positions.
    ///
    /// Blank patterns are skipped and removed from the custom lists, so
    /// a stray empty entry can never flag everything as distracting.
    pub fn check_distraction(
        &mut self,
        url: Option<&str>,
        window_title: Option<&str>,
        app_name: Option<&str>,
        page_title: Option<&str>,
    ) -> (bool, Option<String>) {
        let patterns: Vec<String> = self.all_patterns().iter().map(|p| p.to_string()).collect();
        let mut invalid: Vec<String> = Vec::new();

        let url_lower = url.map(str::to_lowercase);
        let window_title_lower = window_title.map(str::to_lowercase);
        let app_name_lower = app_name.map(str::to_lowercase);
        let page_title_lower = page_title.map(str::to_lowercase);

        let mut matched: Option<String> = None;
        for pattern in &patterns {
            if pattern.trim().is_empty() {
                invalid.push(pattern.clone());
                continue;
            }
            let pattern_lower = pattern.to_lowercase();
            let is_domain_pattern = pattern_lower.contains('.') && !pattern_lower.starts_with(' ');

            if is_domain_pattern {
                if let Some(u) = &url_lower {
                    if match_domain(&pattern_lower, u) {
                        matched = Some(pattern.clone());
                        break;
                    }
                }
                if let Some(w) = &window_title_lower {
                    if match_domain(&pattern_lower, w) {
                        matched = Some(pattern.clone());
                        break;
                    }
                }
                // Page-title fallback only when the URL is truly unavailable.
                if url_lower.is_none() {
                    if let Some(t) = &page_title_lower {
                        if let Some(site) = extract_domain_name(&pattern_lower) {
                            if match_site_in_title(&site, t) {
                                matched = Some(pattern.clone());
                                break;
                            }
                        }
                    }
                }
            } else {
                let texts = [&window_title_lower, &app_name_lower, &page_title_lower];
                if texts
                    .into_iter()
                    .flatten()
                    .any(|text| text.contains(&pattern_lower))
                {
                    matched = Some(pattern.clone());
                    break;
                }
            }
        }

        if !invalid.is_empty() {
            self.remove_invalid_patterns(&invalid);
        }

        match matched {
            Some(pattern) => (true, Some(pattern)),
            None => (false, None),
        }
    }

    fn remove_invalid_patterns(&mut self, patterns: &[String]) {
        for pattern in patterns {
            let before = self.custom_urls.len() + self.custom_apps.len();
            self.custom_urls.retain(|p| p != pattern);
            self.custom_apps.retain(|p| p != pattern);
            if self.custom_urls.len() + self.custom_apps.len() < before {
                log_warn!("removed blank blocklist pattern {:?}", pattern);
            }
        }
    }

    pub fn enable_category(&mut self, category_id: &str) -> bool {
        if presets::category(category_id).is_some() {
            self.enabled_categories.insert(category_id.to_string());
            log_info!("enabled blocklist category: {}", category_id);
            return true;
        }
        false
    }

    pub fn disable_category(&mut self, category_id: &str) -> bool {
        if self.enabled_categories.remove(category_id) {
            log_info!("disabled blocklist category: {}", category_id);
            return true;
        }
        false
    }

    pub fn enable_quick_site(&mut self, site_id: &str) -> bool {
        if presets::quick_site(site_id).is_some() {
            self.enabled_quick_sites.insert(site_id.to_string());
            log_info!("enabled quick block site: {}", site_id);
            return true;
        }
        false
    }

    pub fn disable_quick_site(&mut self, site_id: &str) -> bool {
        if self.enabled_quick_sites.remove(site_id) {
            log_info!("disabled quick block site: {}", site_id);
            return true;
        }
        false
    }

    pub fn enable_gadget(&mut self, gadget_id: &str) -> bool {
        if presets::GADGET_IDS.contains(&gadget_id) {
            self.enabled_gadgets.insert(gadget_id.to_string());
            return true;
        }
        false
    }

    pub fn disable_gadget(&mut self, gadget_id: &str) -> bool {
        self.enabled_gadgets.remove(gadget_id)
    }

    /// Custom URLs are trimmed and lowercased on entry so matching stays
    /// case-insensitive against lowercased screen text.
    pub fn add_custom_url(&mut self, url: &str) -> bool {
        let url = url.trim().to_lowercase();
        if !url.is_empty() && !self.custom_urls.contains(&url) {
            log_info!("added custom blocklist url: {}", url);
            self.custom_urls.push(url);
            return true;
        }
        false
    }

    pub fn add_custom_app(&mut self, app_name: &str) -> bool {
        let app_name = app_name.trim().to_string();
        if !app_name.is_empty() && !self.custom_apps.contains(&app_name) {
            log_info!("added custom blocklist app: {}", app_name);
            self.custom_apps.push(app_name);
            return true;
        }
        false
    }

    pub fn remove_custom_url(&mut self, url: &str) -> bool {
        let before = self.custom_urls.len();
        self.custom_urls.retain(|p| p != url);
        self.custom_urls.len() < before
    }

    pub fn remove_custom_app(&mut self, app_name: &str) -> bool {
        let before = self.custom_apps.len();
        self.custom_apps.retain(|p| p != app_name);
        self.custom_apps.len() < before
    }
}

/// Domain matching with boundary checks. A bare domain only matches at
/// a protocol, www, subdomain, or path boundary, or at the start of the
/// text. Patterns that already carry a "://" or "/" prefix are matched
/// as plain substrings.
fn match_domain(pattern: &str, text: &str) -> bool {
    if pattern.starts_with("://") || pattern.starts_with('/') {
        return text.contains(pattern);
    }

    let boundary_prefixes = [
        format!("://{}", pattern),
        format!("://www.{}", pattern),
        format!(".{}", pattern),
        format!("/{}", pattern),
    ];
    if boundary_prefixes.iter().any(|p| text.contains(p.as_str())) {
        return true;
    }

    text.starts_with(pattern) || text.starts_with(&format!("www.{}", pattern))
}

/// Extracts the site name from a domain pattern: "youtube.com" becomes
/// "youtube", "://x.com" becomes "x", "www.facebook.com" becomes
/// "facebook".
fn extract_domain_name(domain_pattern: &str) -> Option<String> {
    let mut clean = domain_pattern;
    for prefix in ["://", "www.", "http://", "https://"] {
        if let Some(rest) = clean.strip_prefix(prefix) {
            clean = rest;
        }
    }
    if let Some(idx) = clean.find('/') {
        clean = &clean[..idx];
    }

    if clean.contains('.') {
        let parts: Vec<&str> = clean.split('.').collect();
        let first = parts[0];
        if !["www", "m", "mobile", "web"].contains(&first) {
            return Some(first.to_string());
        }
        return parts.get(1).map(|p| p.to_string());
    }

    if clean.is_empty() {
        None
    } else {
        Some(clean.to_string())
    }
}

/// True when the site name appears in the title in a structural
/// position. Sites without a title-pattern entry never match here.
fn match_site_in_title(site_name: &str, title: &str) -> bool {
    if site_name.is_empty() || title.is_empty() {
        return false;
    }
    let Some(spec) = presets::title_patterns(site_name) else {
        return false;
    };

    if spec
        .exact_end_patterns
        .iter()
        .any(|pattern| title.ends_with(pattern))
    {
        return true;
    }

    spec.variations
        .iter()
        .any(|variation| title_matches_variation(variation, title))
}

/// Matches the exact title, an end-of-title segment after a separator,
/// or (for names longer than [`SHORT_NAME_MAX_LEN`]) the start of the
/// title before a separator.
fn title_matches_variation(variation: &str, title: &str) -> bool {
    if variation.is_empty() || title.is_empty() {
        return false;
    }
    if title == variation || title.trim() == variation {
        return true;
    }

    for sep in TITLE_SEPARATORS {
        if title.contains(sep) {
            if let Some(last) = title.rsplit(sep).next() {
                if last.trim() == variation {
                    return true;
                }
            }
        }
    }

    if variation.len() <= SHORT_NAME_MAX_LEN {
        return false;
    }
    TITLE_SEPARATORS
        .iter()
        .any(|sep| title.starts_with(&format!("{}{}", variation, sep)))
}

//! Post-render HTML fixups
//!
//! A fixed, ordered pipeline of rewrite stages applied to rendered HTML.
//! The stages are content-shape heuristics for prose patterns that appear
//! in the source articles; a stage that matches nothing leaves the document
//! unchanged and never fails.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::markdown::class;
use crate::config::BlogConfig;

const TH_CLASS: &str = "border border-gray-300 px-4 py-3 text-left font-semibold";
const TD_CLASS: &str = "border border-gray-300 px-4 py-3";

/// HTML rewrite pipeline
pub struct Rewriter {
    /// Acronym -> URL, in application order
    acronym_links: IndexMap<String, String>,
}

impl Rewriter {
    /// Create a rewriter from the site configuration
    pub fn new(config: &BlogConfig) -> Self {
        Self {
            acronym_links: config.acronym_links.clone(),
        }
    }

    /// Apply all rewrite stages in order
    pub fn apply(&self, html: &str) -> String {
        let html = retheme_skill_table(html);
        let html = restyle_cta(&html);
        let html = restyle_references(&html);
        let html = build_comparison_table(&html);
        let html = wrap_section(&html, "Key Questions to Ask:", "space-y-6 mb-10");
        let html = wrap_section(
            &html,
            "Pro Tips:",
            "space-y-4 mb-10 pl-4 border-l-4 border-gray-200",
        );
        let html = self.link_acronyms(&html);
        separate_tag_runs(&html)
    }

    /// Turn the first unlinked occurrence of each configured acronym into
    /// an external link. An occurrence already inside link text (followed by
    /// `</a>`) is skipped, as is a prefix of a longer configured acronym
    /// (plain AMI inside AMI/AMS).
    fn link_acronyms(&self, html: &str) -> String {
        let mut html = html.to_string();
        for (acronym, url) in &self.acronym_links {
            let is_prefix_of_longer = self
                .acronym_links
                .keys()
                .any(|other| other != acronym && other.starts_with(&format!("{}/", acronym)));
            html = link_first_unlinked(&html, acronym, url, is_prefix_of_longer);
        }
        html
    }
}

fn link_first_unlinked(html: &str, acronym: &str, url: &str, skip_slash: bool) -> String {
    let mut search_from = 0;
    while let Some(pos) = html[search_from..].find(acronym) {
        let at = search_from + pos;
        let after = &html[at + acronym.len()..];

        let already_linked = after.starts_with("</a>");
        let longer_run = skip_slash && after.starts_with('/');

        if !already_linked && !longer_run {
            let anchor = format!(
                r#"<a class="{}" href="{}" target="_blank">{}</a>"#,
                class::LINK,
                url,
                acronym
            );
            return format!("{}{}{}", &html[..at], anchor, after);
        }

        search_from = at + acronym.len();
    }
    html.to_string()
}

lazy_static! {
    static ref SKILL_TABLE: Regex = Regex::new(
        r#"<table class="[^"]+">(?:<thead[^>]*>)?<tr><th[^>]*>Material Type</th><th[^>]*>Cognitive Skill</th><th[^>]*>Learning Outcome</th></tr>(?:</thead>)?<tbody>"#
    )
    .unwrap();
    static ref CTA_CONTAINER: Regex = Regex::new(
        r#"(?s)<div class="cta-container">(.*?)<a href="/states" class="cta-button">(.*?)</a>(.*?)</div>"#
    )
    .unwrap();
    static ref REFERENCE_LINK: Regex =
        Regex::new(r#"<span class="reference-link">\[(\d+)\]</span>"#).unwrap();
    static ref COMPARISON_SECTION: Regex =
        Regex::new(r"(?s)Montessori vs\. Traditional Education \(Quick Comparison\):.*?</p>")
            .unwrap();
    static ref ROW_LABEL: Regex = Regex::new(r"^[a-zA-Z]+\s*:").unwrap();
}

/// Re-theme the "Material Type / Cognitive Skill / Learning Outcome" table
/// with a green header
fn retheme_skill_table(html: &str) -> String {
    let replacement = format!(
        r#"<table class="border-collapse w-full my-8 bg-white"><thead class="bg-green-50"><tr><th class="{th}">Material Type</th><th class="{th}">Cognitive Skill</th><th class="{th}">Learning Outcome</th></tr></thead><tbody>"#,
        th = TH_CLASS
    );
    SKILL_TABLE.replace_all(html, replacement.as_str()).into_owned()
}

/// Restyle `cta-container` divs into the call-to-action block
fn restyle_cta(html: &str) -> String {
    CTA_CONTAINER
        .replace_all(
            html,
            r#"<div class="bg-green-50 border border-green-100 rounded-lg p-6 my-10 text-center"><div class="max-w-2xl mx-auto">${1}<a href="/states" class="inline-block bg-green-600 hover:bg-green-700 text-white font-medium py-2 px-6 mt-4 rounded-md transition-colors">${2}</a>${3}</div></div>"#,
        )
        .into_owned()
}

/// Turn `[n]` reference spans into superscript anchor pills
fn restyle_references(html: &str) -> String {
    REFERENCE_LINK
        .replace_all(
            html,
            r##"<a href="#reference-${1}" class="inline-flex items-center justify-center text-xs font-medium bg-gray-100 text-gray-700 rounded-md h-5 w-auto px-1.5 hover:bg-gray-200 transition-colors" style="vertical-align:super;line-height:1">[${1}]</a>"##,
        )
        .into_owned()
}

/// Rebuild the "Montessori vs. Traditional Education" pipe-run paragraph
/// as a real three-column table. Applies to the first occurrence only and
/// leaves the section alone when there are too few cells.
fn build_comparison_table(html: &str) -> String {
    COMPARISON_SECTION
        .replace(html, |caps: &Captures| {
            let section = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let cells: Vec<&str> = section
                .split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();

            if cells.len() <= 3 {
                return section.to_string();
            }

            let mut table = String::from(
                r#"<h3 class="text-xl font-bold mt-10 mb-6">Montessori vs. Traditional Education (Quick Comparison):</h3>"#,
            );
            table.push_str(r#"<table class="border-collapse w-full my-8 mb-12">"#);
            table.push_str(r#"<thead class="bg-gray-100"><tr>"#);
            for header in ["Aspect", "Montessori", "Traditional"] {
                table.push_str(&format!(r#"<th class="{}">{}</th>"#, TH_CLASS, header));
            }
            table.push_str("</tr></thead><tbody>");

            let mut i = 1;
            while i + 2 < cells.len() {
                let aspect = ROW_LABEL.replace(cells[i], "").trim().to_string();
                table.push_str("<tr>");
                table.push_str(&format!(
                    r#"<td class="{} font-medium">{}</td>"#,
                    TD_CLASS, aspect
                ));
                table.push_str(&format!(r#"<td class="{}">{}</td>"#, TD_CLASS, cells[i + 1]));
                table.push_str(&format!(r#"<td class="{}">{}</td>"#, TD_CLASS, cells[i + 2]));
                table.push_str("</tr>");
                i += 3;
            }

            table.push_str("</tbody></table>");
            table
        })
        .into_owned()
}

/// Promote a marker paragraph ("Key Questions to Ask:", "Pro Tips:") to a
/// heading and wrap everything up to the next heading in a styled container
fn wrap_section(html: &str, title: &str, wrapper_class: &str) -> String {
    if !html.contains(title) {
        return html.to_string();
    }

    let pattern = format!(r"(?s)<p[^>]*>{}</p>(.*?)(<h|\z)", regex::escape(title));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return html.to_string(),
    };

    re.replace(html, |caps: &Captures| {
        format!(
            r#"<h3 class="text-xl font-bold mt-10 mb-6">{}</h3><div class="{}">{}</div>{}"#,
            title,
            wrapper_class,
            &caps[1],
            caps.get(2).map(|m| m.as_str()).unwrap_or_default()
        )
    })
    .into_owned()
}

/// Insert a decorative separator between camel-case-joined tag runs like
/// "EducationMontessoriSchool Choice"
fn separate_tag_runs(html: &str) -> String {
    const SEPARATOR: &str = r#" <span class="tag-separator hidden md:inline-block mx-1">•</span> "#;

    let chars: Vec<(usize, char)> = html.char_indices().collect();
    let mut out = String::with_capacity(html.len() + 64);
    let mut idx = 0;

    while idx < chars.len() {
        let (start, c) = chars[idx];
        if c.is_ascii_uppercase() {
            // Consume [A-Z][a-z]+
            let mut j = idx + 1;
            while j < chars.len() && chars[j].1.is_ascii_lowercase() {
                j += 1;
            }
            let end = chars.get(j).map(|(pos, _)| *pos).unwrap_or(html.len());
            out.push_str(&html[start..end]);
            if j > idx + 1 && j < chars.len() && chars[j].1.is_ascii_uppercase() {
                out.push_str(SEPARATOR);
            }
            idx = j;
        } else {
            out.push(c);
            idx += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> Rewriter {
        Rewriter::new(&BlogConfig::default())
    }

    #[test]
    fn test_acronym_first_occurrence_linked() {
        let html = "<p>Look for MACTE accreditation. MACTE sets standards.</p>";
        let out = rewriter().apply(html);
        assert!(out.contains(r#"href="https://www.macte.org/" target="_blank">MACTE</a>"#));
        // Only the first occurrence becomes a link
        assert_eq!(out.matches("macte.org").count(), 1);
    }

    #[test]
    fn test_acronym_already_linked_is_skipped() {
        let html = r#"<p><a href="https://www.macte.org/">MACTE</a> and later MACTE again.</p>"#;
        let out = rewriter().apply(html);
        // The second, unlinked occurrence gets the link
        assert_eq!(out.matches("macte.org").count(), 2);
        assert!(out.contains("later <a class="));
    }

    #[test]
    fn test_ami_not_linked_inside_ami_ams() {
        let html = "<p>Accredited by AMI/AMS programs.</p>";
        let out = rewriter().apply(html);
        assert!(out.contains(r#"target="_blank">AMI/AMS</a>"#));
        // No nested anchor was produced for the AMI prefix
        assert_eq!(out.matches("<a class=").count(), 1);
    }

    #[test]
    fn test_plain_ami_still_linked() {
        let html = "<p>The AMI method.</p>";
        let out = rewriter().apply(html);
        assert!(out.contains(r#"href="https://montessori-ami.org/" target="_blank">AMI</a>"#));
    }

    #[test]
    fn test_reference_links() {
        let html = r#"<p>Cited<span class="reference-link">[2]</span> here.</p>"#;
        let out = restyle_references(html);
        assert!(out.contains(r##"<a href="#reference-2""##));
        assert!(out.contains(r#"style="vertical-align:super;line-height:1""#));
        assert!(out.contains("[2]</a>"));
    }

    #[test]
    fn test_key_questions_section_wrapped() {
        let html = r#"<p class="mb-6 leading-relaxed">Key Questions to Ask:</p><p>One?</p><p>Two?</p><h2>Next</h2>"#;
        let out = wrap_section(html, "Key Questions to Ask:", "space-y-6 mb-10");
        assert!(out.contains(
            r#"<h3 class="text-xl font-bold mt-10 mb-6">Key Questions to Ask:</h3><div class="space-y-6 mb-10"><p>One?</p><p>Two?</p></div><h2>Next</h2>"#
        ));
    }

    #[test]
    fn test_section_wrap_to_end_of_document() {
        let html = r#"<p>Pro Tips:</p><p>Visit twice.</p>"#;
        let out = wrap_section(html, "Pro Tips:", "x");
        assert!(out.ends_with(r#"<div class="x"><p>Visit twice.</p></div>"#));
    }

    #[test]
    fn test_tag_run_separator() {
        let out = separate_tag_runs("EducationMontessoriSchool Choice");
        assert_eq!(
            out,
            r#"Education <span class="tag-separator hidden md:inline-block mx-1">•</span> Montessori <span class="tag-separator hidden md:inline-block mx-1">•</span> School Choice"#
        );
    }

    #[test]
    fn test_tag_run_separator_ignores_plain_text() {
        let out = separate_tag_runs("<p>Nothing joined here.</p>");
        assert_eq!(out, "<p>Nothing joined here.</p>");
    }

    #[test]
    fn test_comparison_table_built() {
        let html = "<p>Montessori vs. Traditional Education (Quick Comparison): \
                    | Pace: self-directed | teacher-led \
                    | Classroom: mixed-age | same-age \
                    | Materials: hands-on | textbook</p>";
        let out = build_comparison_table(html);
        assert!(out.contains("<table"));
        assert!(out.contains("<th class=\"border border-gray-300 px-4 py-3 text-left font-semibold\">Aspect</th>"));
        assert!(out.contains(">self-directed</td>"));
        // The "Pace:" label is stripped from the aspect cell
        assert!(!out.contains("Pace: self-directed</td>"));
    }

    #[test]
    fn test_comparison_section_too_small_untouched() {
        let html = "<p>Montessori vs. Traditional Education (Quick Comparison): | only | two</p>";
        let out = build_comparison_table(html);
        assert_eq!(out, html);
    }

    #[test]
    fn test_cta_container_restyled() {
        let html = r#"<div class="cta-container"><p>Find a school.</p><a href="/states" class="cta-button">Browse states</a><p>Free.</p></div>"#;
        let out = restyle_cta(html);
        assert!(out.contains(r#"<div class="bg-green-50 border border-green-100"#));
        assert!(out.contains(">Browse states</a>"));
    }

    #[test]
    fn test_skill_table_rethemed() {
        let html = r#"<table class="border-collapse w-full my-8"><thead class="bg-gray-100"><tr><th class="x">Material Type</th><th class="x">Cognitive Skill</th><th class="x">Learning Outcome</th></tr></thead><tbody></tbody></table>"#;
        let out = retheme_skill_table(html);
        assert!(out.contains(r#"<thead class="bg-green-50">"#));
        assert!(out.contains("bg-white"));
    }

    #[test]
    fn test_non_matching_input_unchanged() {
        let html = "<p>plain paragraph</p>";
        assert_eq!(rewriter().apply(html), html);
    }
}

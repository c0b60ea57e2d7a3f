//! Hierarchy inference strategies
//!
//! Each strategy maps the parsed pages of a crawl to a [`ModuleMap`]. They are
//! tried in order and the first non-empty result wins; results are never
//! merged.
//!
//! | Strategy | Modules | Submodules |
//! |----------|---------|------------|
//! | `h1` | every h1 | h2 headings in the h1's section |
//! | `h2` | 15 most frequent h2 texts | h3 headings in the first occurrence's section |
//! | `url-path` | first meaningful URL path segment (≥ 2 headings) | every h2..h4 of the group |
//!
//! Section scans stop at the end of the page the module heading is on.

use crate::content::{child_headings, ParsedPage};
use crate::inference::clean::heading_name;
use crate::inference::{ModuleMap, ModuleNode, SubmoduleNode};
use std::collections::HashMap;
use url::Url;

/// Modules kept by the h2 strategy
const MAX_H2_MODULES: usize = 15;

/// Path segments that never name a module
const GENERIC_SEGMENTS: &[&str] = &["docs", "documentation", "help", "support"];

/// Headings a URL group needs to become a module
const MIN_GROUP_HEADINGS: usize = 2;

/// A named inference strategy
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub run: fn(&[ParsedPage]) -> ModuleMap,
}

/// Strategies in the order they are tried
pub const DEFAULT_STRATEGIES: [Strategy; 3] = [
    Strategy {
        name: "h1",
        run: modules_from_h1,
    },
    Strategy {
        name: "h2",
        run: modules_from_h2,
    },
    Strategy {
        name: "url-path",
        run: modules_from_url_paths,
    },
];

/// Infers the module hierarchy of a crawl
///
/// # Example
///
/// ```
/// let html = r#"<html><body><h1>Billing</h1>
///     <p>Billing explains how charges are calculated.</p>
///     <h2>Invoices</h2><p>Invoices are sent on the first of each month.</p>
///     </body></html>"#;
/// let page = docmap::parse(html, "https://example.com/billing").unwrap();
/// let modules = docmap::infer_modules(&[page]);
/// assert_eq!(modules.names(), vec!["Billing"]);
/// ```
pub fn infer_modules(pages: &[ParsedPage]) -> ModuleMap {
    try_strategies(pages, &DEFAULT_STRATEGIES).unwrap_or_default()
}

/// Runs `strategies` in order and returns the first non-empty result
pub fn try_strategies(pages: &[ParsedPage], strategies: &[Strategy]) -> Option<ModuleMap> {
    strategies.iter().find_map(|strategy| {
        let modules = (strategy.run)(pages);
        if modules.is_empty() {
            tracing::debug!("Strategy {} found no modules", strategy.name);
            None
        } else {
            tracing::debug!(
                "Strategy {} found {} modules",
                strategy.name,
                modules.len()
            );
            Some(modules)
        }
    })
}

/// Every h1 is a module; h2s in its section are submodules
pub fn modules_from_h1(pages: &[ParsedPage]) -> ModuleMap {
    let mut modules = ModuleMap::new();

    for page in pages {
        for (index, heading) in page.headings.iter().enumerate() {
            if heading.level == 1 {
                add_module(&mut modules, page, index);
            }
        }
    }

    modules
}

/// The most frequent h2 texts are modules; h3s in their section are submodules
pub fn modules_from_h2(pages: &[ParsedPage]) -> ModuleMap {
    // text -> (count, first occurrence as (page, heading index))
    let mut counts: HashMap<&str, (usize, (usize, usize))> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (page_index, page) in pages.iter().enumerate() {
        for (index, heading) in page.headings.iter().enumerate() {
            if heading.level != 2 {
                continue;
            }
            counts
                .entry(heading.text.as_str())
                .and_modify(|(count, _)| *count += 1)
                .or_insert_with(|| {
                    order.push(heading.text.as_str());
                    (1, (page_index, index))
                });
        }
    }

    // Stable sort keeps first-seen order among equal counts
    let mut ranked: Vec<(&str, usize, (usize, usize))> = order
        .into_iter()
        .filter_map(|text| counts.get(text).map(|&(count, first)| (text, count, first)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut modules = ModuleMap::new();
    for (_, _, (page_index, index)) in ranked.into_iter().take(MAX_H2_MODULES) {
        add_module(&mut modules, &pages[page_index], index);
    }
    modules
}

/// Pages are grouped by their first meaningful path segment
pub fn modules_from_url_paths(pages: &[ParsedPage]) -> ModuleMap {
    let mut groups: Vec<(String, Vec<&ParsedPage>)> = Vec::new();

    for page in pages.iter().filter(|page| !page.headings.is_empty()) {
        let Some(name) = path_module_name(&page.url) else {
            continue;
        };
        match groups.iter_mut().find(|(group, _)| *group == name) {
            Some((_, members)) => members.push(page),
            None => groups.push((name, vec![page])),
        }
    }

    let mut modules = ModuleMap::new();

    for (name, members) in groups {
        let heading_count: usize = members.iter().map(|page| page.headings.len()).sum();
        if heading_count < MIN_GROUP_HEADINGS {
            continue;
        }

        let first = members[0];
        let module = modules.get_or_insert_with(&name, || {
            ModuleNode::new(name.as_str(), first.url.as_str(), first.text.as_str())
        });

        for page in members {
            for (index, heading) in page.headings.iter().enumerate() {
                if heading.level < 2 {
                    continue;
                }
                if let Some(sub_name) = heading_name(&heading.text) {
                    module.add_submodule(SubmoduleNode::new(sub_name, heading_content(page, index)));
                }
            }
        }
    }

    modules
}

/// Adds (or extends) the module opened by heading `index` of `page`
fn add_module(modules: &mut ModuleMap, page: &ParsedPage, index: usize) {
    let heading = &page.headings[index];
    let Some(name) = heading_name(&heading.text) else {
        tracing::trace!("Rejected module heading {:?}", heading.text);
        return;
    };

    let module = modules.get_or_insert_with(&name, || {
        ModuleNode::new(
            name.as_str(),
            heading.source_url.as_str(),
            heading_content(page, index),
        )
    });

    for (sub_index, sub_heading) in child_headings(&page.headings, index) {
        if let Some(sub_name) = heading_name(&sub_heading.text) {
            module.add_submodule(SubmoduleNode::new(sub_name, heading_content(page, sub_index)));
        }
    }
}

/// Section text of a heading, else the whole page text
fn heading_content(page: &ParsedPage, index: usize) -> String {
    let section = page.section_text(index);
    if section.is_empty() {
        page.text.clone()
    } else {
        section
    }
}

/// Title-cased first path segment that is not generic
fn path_module_name(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let segment = url
        .path_segments()?
        .find(|segment| !segment.is_empty() && !GENERIC_SEGMENTS.contains(segment))?;

    heading_name(&title_case(&segment.replace(['-', '_'], " ")))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

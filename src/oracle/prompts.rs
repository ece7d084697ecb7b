//! Prompt builders. Every prompt asks for a `{"data": "..."}` answer so all
//! callers share one parsing path.

use crate::models::{Ecosystem, SearchResult};

/// Longest slice of a license file sent for classification.
const MAX_LICENSE_CHARS: usize = 30_000;

const JSON_ONLY: &str = "No explanations, no markdown, just the JSON.";

fn answer_format(placeholder: &str) -> String {
    format!(
        "Return ONLY valid JSON in this exact format:\n{{\"data\": \"{}\"}}\n\n{}",
        placeholder, JSON_ONLY
    )
}

/// Numbered, one-result-per-line rendering of search hits.
pub fn render_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} - {}", i, r.title, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn repository_query(name: &str) -> String {
    format!(
        "Given this dependency: {}, generate the best search query to find its official GitHub \
         repository link. Format it like this: owner repository official github repository\n\n{}",
        name,
        answer_format("your search query here")
    )
}

pub fn pick_repository(name: &str, results: &[SearchResult]) -> String {
    format!(
        "Given these search results:\n{}\n\nChoose the index of the GitHub repository that best \
         matches this dependency name: {}. Return the index of the repository root of this \
         dependency. Do not return a link to the owner or to a file. If there is no good match, \
         return an empty string.\n\n{}",
        render_results(results),
        name,
        answer_format("your search result index here")
    )
}

pub fn registry_query(entry: &str, ecosystem: Ecosystem) -> String {
    format!(
        "Given this {} package dependency: {}, return the best Google search query to find its \
         official {} page.\n\n{}",
        ecosystem,
        entry,
        ecosystem.registry_name(),
        answer_format("your search query here")
    )
}

pub fn package_name(entry: &str, ecosystem: Ecosystem, results: &[SearchResult]) -> String {
    format!(
        "Given this {} package dependency: {} and these search results:\n{}\n\nReturn the \
         official {} name of the package.\n\n{}",
        ecosystem,
        entry,
        render_results(results),
        ecosystem.registry_name(),
        answer_format("your package name here")
    )
}

pub fn license_path(tree: &str) -> String {
    format!(
        r#"You are analyzing a GitHub repository structure to locate the license file.

Repository structure:
{tree}

Task: Find the path to the LICENSE file from the repository root.

Common license file names include:
- LICENSE, LICENSE.md, LICENSE.txt
- LICENCE, LICENCE.md, LICENCE.txt
- license, license.md, license.txt
- COPYING

Requirements:
- Return the EXACT path as it appears in the structure
- If no license file exists, return an empty string ""
- Return ONLY valid JSON, no markdown code blocks, no explanations

Expected JSON format:
{{"data": "LICENSE.md"}}

or if not found:
{{"data": ""}}"#
    )
}

pub fn license_type(text: &str) -> String {
    let text: String = text.chars().take(MAX_LICENSE_CHARS).collect();
    format!(
        r#"You are analyzing a license file to identify its type.

License content:
{text}

Task: Identify the license type using SPDX identifiers when possible.

Classification rules:
1. If it matches a standard SPDX license exactly, return the SPDX identifier (e.g., "MIT", "Apache-2.0", "GPL-3.0", "BSD-3-Clause")
2. If it's a modified version of a known license, prefix with "Modified " (e.g., "Modified MIT", "Modified Apache-2.0")
3. If it's a custom or unrecognizable license, return "Custom"

Common SPDX identifiers:
- MIT, Apache-2.0, GPL-2.0, GPL-3.0, BSD-2-Clause, BSD-3-Clause, ISC, MPL-2.0, LGPL-2.1, LGPL-3.0, AGPL-3.0, Unlicense, CC0-1.0

Look for key phrases:
- "MIT License" → MIT
- "Apache License, Version 2.0" → Apache-2.0
- "GNU General Public License" → GPL-2.0 or GPL-3.0
- Modified versions will have custom terms or removed sections

Requirements:
- Return ONLY valid JSON, no markdown code blocks, no explanations
- Use exact SPDX identifiers from the list above

Expected JSON format:
{{"data": "MIT"}}

or for modified:
{{"data": "Modified Apache-2.0"}}

or for custom:
{{"data": "Custom"}}"#
    )
}

pub fn display_name(input: &str) -> String {
    format!(
        "Given this dependency: {}, generate the best fitting name for that dependency\n\n{}",
        input,
        answer_format("your dependency name here")
    )
}

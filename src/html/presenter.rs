//! Result presenter
//!
//! Pure string construction: banner, dropdown options, and the filled page.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::relay::RelayResult;
use crate::remote::RemoteFileList;
use crate::upload::Target;

use super::template::PageTemplate;

/// Success or warning banner; empty for a plain page view
pub fn banner(target: Target, result: &RelayResult) -> String {
    if result.is_no_action() {
        return String::new();
    }

    match (result.worked, &result.id) {
        (true, Some(id)) => {
            let noun = target.noun();
            format!(
                "<p class=\"highlight\">Added {noun} {id} to the database. \
                 <a href=\"../{noun}_view.html?{field}={query}\">Click here to edit this {noun}</a>.</p>",
                noun = noun,
                id = encode_text(id),
                field = target.id_field(),
                query = encode_double_quoted_attribute(&urlencoding::encode(id)),
            )
        }
        (true, None) => format!(
            "<p class=\"highlight\">{}</p>",
            encode_text(result.message.as_deref().unwrap_or("Done"))
        ),
        (false, _) => format!(
            "<p class=\"warning\">{}</p>",
            encode_text(result.message.as_deref().unwrap_or("Request failed"))
        ),
    }
}

/// One `<option>` per remote file.
///
/// The studies page selects `<revision>/<id>` in a single field.
pub fn file_options(target: Target, list: &RemoteFileList) -> String {
    list.files
        .iter()
        .map(|file| {
            let value = match target {
                Target::Source => file.clone(),
                Target::Study => format!("{}/{}", list.revision, file),
            };
            format!(
                "<option value=\"{}\">{}</option>\n",
                encode_double_quoted_attribute(&value),
                encode_text(file)
            )
        })
        .collect()
}

/// Fill a page template with the result, revision and file list
pub fn render(
    template: &PageTemplate,
    target: Target,
    result: &RelayResult,
    list: &RemoteFileList,
) -> String {
    template.fill(
        &banner(target, result),
        &encode_text(&list.revision),
        &file_options(target, list),
    )
}

/// Standalone page shown when rendering could not complete
pub fn failure_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head><title>OTU: error</title></head>\n  <body>\n    \
         <h1>Something went wrong</h1>\n    <p class=\"warning\">{}</p>\n  </body>\n</html>\n",
        encode_text(message)
    )
}

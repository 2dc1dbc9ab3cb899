//! Body extraction: the component's markup becomes a registration statement.

use crate::minify::{minify, MinifyPolicy};
use crate::scripts::{classify, ScriptKind};
use crate::transform::OutputFragment;
use html_parser::{Document, Element, ParentRef};

/// Extracts the component body from its own working parse of the document.
///
/// Inline and local scripts are dropped (the script pass re-emits them) and
/// links are dropped unconditionally (the link pass owns them); external
/// scripts stay in place as literal markup. The remainder is serialized from
/// the component node's parent (or the whole document when no component node
/// exists), minified, and emitted as one registration statement costing
/// three generated lines. An empty minification result emits nothing.
pub(crate) fn dom_module(
    mut document: Document,
    is_component: fn(&Element) -> bool,
    is_link: fn(&Element) -> bool,
    is_script: fn(&Element) -> bool,
) -> OutputFragment {
    document.remove_elements(|el| is_script(el) && classify(el) != ScriptKind::External);
    document.remove_elements(is_link);

    let component_parent = document.parent_of_first(is_component);
    let found = component_parent.is_some();
    let markup = match component_parent {
        Some(ParentRef::Element(parent)) => parent.serialize(),
        Some(ParentRef::Document) | None => document.serialize(),
    };

    let minified = minify(&markup, &MinifyPolicy::default());
    if minified.is_empty() {
        return OutputFragment::default();
    }

    let escaped = minified.replace('\'', "\\'");
    let text = if found {
        format!("\nRegisterHtmlTemplate.register('{}');\n", escaped)
    } else {
        format!("\nRegisterHtmlTemplate.toBody('{}');\n", escaped)
    };

    OutputFragment {
        text,
        line_count: 3,
    }
}

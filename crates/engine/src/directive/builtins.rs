//! Functions every registry starts with.

use chrono::Utc;
use chrono::format::{Item, StrftimeItems};

use crate::error::FunctionError;
use crate::render::escape_html;

use super::fragment::Fragment;
use super::registry::{FunctionCall, FunctionRegistry};

/// Registers the built-in functions.
///
/// - `parameters` - the arguments, escaped and joined with `/`
/// - `today` - the current UTC date, optionally in a chrono format
/// - `title` - sets the page title from the arguments
pub fn register_builtins(registry: &mut FunctionRegistry) {
    registry.register("parameters", parameters);
    registry.register("today", today);
    registry.register("title", title);
}

fn parameters(call: &FunctionCall<'_>) -> Result<Fragment, FunctionError> {
    Ok(Fragment::text(escape_html(&call.args.join("/"))))
}

fn today(call: &FunctionCall<'_>) -> Result<Fragment, FunctionError> {
    let format = match call.args {
        [] => "%Y-%m-%d".to_string(),
        args => args.join(" "),
    };
    if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
        return Err(FunctionError::InvalidArguments(format!(
            "invalid date format '{}'",
            format
        )));
    }
    Ok(Fragment::text(Utc::now().format(&format).to_string()))
}

fn title(call: &FunctionCall<'_>) -> Result<Fragment, FunctionError> {
    if call.args.is_empty() {
        return Err(FunctionError::InvalidArguments(
            "title requires at least one word".to_string(),
        ));
    }
    Ok(Fragment::empty().with_title(call.args.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::fragment::FragmentText;
    use crate::resolver::CapturedParameters;
    use lectern_persistence::types::RecordId;

    fn call_with<'a>(
        args: &'a [String],
        parameters: &'a CapturedParameters,
    ) -> FunctionCall<'a> {
        FunctionCall {
            name: "test",
            args,
            parameters,
            record_id: RecordId::new(1),
        }
    }

    #[test]
    fn test_parameters_escapes() {
        let args = vec!["a<b".to_string(), "c".to_string()];
        let params = CapturedParameters::new();
        let fragment = parameters(&call_with(&args, &params)).unwrap();
        assert_eq!(fragment, Fragment::text("a&lt;b/c"));
    }

    #[test]
    fn test_today_default_format() {
        let params = CapturedParameters::new();
        let fragment = today(&call_with(&[], &params)).unwrap();
        match fragment.text {
            FragmentText::Single(text) => assert_eq!(text.len(), "2024-01-31".len()),
            other => panic!("unexpected text {:?}", other),
        }
    }

    #[test]
    fn test_today_rejects_bad_format() {
        let args = vec!["%Q".to_string()];
        let params = CapturedParameters::new();
        assert!(today(&call_with(&args, &params)).is_err());
    }

    #[test]
    fn test_title_requires_args() {
        let params = CapturedParameters::new();
        assert!(title(&call_with(&[], &params)).is_err());

        let args = vec!["About".to_string(), "us".to_string()];
        let fragment = title(&call_with(&args, &params)).unwrap();
        assert_eq!(fragment.title.as_deref(), Some("About us"));
    }
}

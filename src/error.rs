use std::num::ParseFloatError;
use wasm_bindgen::JsValue;

/// Internal failures while reading track markup. These never reach the host
/// UI as errors: the importers degrade to partial or empty output instead.
#[derive(Debug)]
pub enum TopoError {
    XmlParse(quick_xml::Error),
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    FloatParse(ParseFloatError),
}

impl std::fmt::Display for TopoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlParse(e) => write!(f, "XML parse error: {e}"),
            Self::MissingAttribute { element, attribute } => {
                write!(f, "Missing attribute '{attribute}' on <{element}>")
            }
            Self::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Invalid value '{value}' for attribute '{attribute}' on <{element}>"
            ),
            Self::FloatParse(e) => write!(f, "Float parse error: {e}"),
        }
    }
}

impl std::error::Error for TopoError {}

impl From<quick_xml::Error> for TopoError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e)
    }
}

impl From<ParseFloatError> for TopoError {
    fn from(e: ParseFloatError) -> Self {
        Self::FloatParse(e)
    }
}

impl From<TopoError> for JsValue {
    fn from(e: TopoError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

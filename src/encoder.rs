//! Maps forms onto the JSON documents understood by the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::{Button, Element, Form};

/// The wire representation of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Document {
    #[serde(rename = "custom_form")]
    Custom {
        title: String,
        content: Vec<ElementDocument>,
    },
    #[serde(rename = "form")]
    Menu {
        title: String,
        content: String,
        buttons: Vec<ButtonDocument>,
    },
    #[serde(rename = "modal")]
    Modal {
        title: String,
        content: String,
        button1: String,
        button2: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementDocument {
    Toggle {
        text: String,
        default: bool,
    },
    Input {
        text: String,
        default: String,
        placeholder: String,
    },
    Label {
        text: String,
    },
    Slider {
        text: String,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Dropdown {
        text: String,
        default: usize,
        options: Vec<String>,
    },
    StepSlider {
        text: String,
        default: usize,
        steps: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonDocument {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDocument {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Url,
    Path,
}

impl Document {
    /// The response a client sends when the player accepts the form as shown:
    /// element defaults, the first menu button, or the first modal button.
    ///
    /// A menu without buttons can only be closed, which answers `null`.
    pub fn default_response(&self) -> Value {
        match self {
            Self::Custom { content, .. } => {
                Value::Array(content.iter().map(ElementDocument::default_value).collect())
            }
            Self::Menu { buttons, .. } if buttons.is_empty() => Value::Null,
            Self::Menu { .. } => Value::from(0),
            Self::Modal { .. } => Value::Bool(true),
        }
    }
}

impl ElementDocument {
    fn default_value(&self) -> Value {
        match self {
            Self::Toggle { default, .. } => Value::Bool(*default),
            Self::Input { default, .. } => Value::String(default.clone()),
            Self::Label { .. } => Value::Null,
            Self::Slider { default, .. } => Value::from(*default),
            Self::Dropdown { default, .. } | Self::StepSlider { default, .. } => {
                Value::from(*default)
            }
        }
    }
}

impl ImageKind {
    fn of(reference: &str) -> Self {
        if reference.starts_with("http:") || reference.starts_with("https:") {
            Self::Url
        } else {
            Self::Path
        }
    }
}

/// Builds the document describing `form`.
pub fn encode(form: &Form) -> Document {
    match form {
        Form::Custom(form) => Document::Custom {
            title: form.title().to_owned(),
            content: form.elements().iter().map(encode_element).collect(),
        },
        Form::Menu(form) => Document::Menu {
            title: form.title().to_owned(),
            content: form.body().to_owned(),
            buttons: form.buttons().iter().map(encode_button).collect(),
        },
        Form::Modal(form) => {
            let [button1, button2] = form.buttons();
            Document::Modal {
                title: form.title().to_owned(),
                content: form.body().to_owned(),
                button1: button1.to_owned(),
                button2: button2.to_owned(),
            }
        }
    }
}

/// Encodes `form` straight to the JSON payload carried by a form request.
pub fn to_payload(form: &Form) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&encode(form))
}

fn encode_button(button: &Button) -> ButtonDocument {
    ButtonDocument {
        text: button.text.clone(),
        image: button.image.as_ref().map(|image| ImageDocument {
            kind: ImageKind::of(image),
            data: image.clone(),
        }),
    }
}

fn encode_element(element: &Element) -> ElementDocument {
    match element.clone() {
        Element::Toggle { text, default } => ElementDocument::Toggle { text, default },
        Element::Input {
            text,
            default,
            placeholder,
        } => ElementDocument::Input {
            text,
            default,
            placeholder,
        },
        Element::Label { text } => ElementDocument::Label { text },
        Element::Slider {
            text,
            min,
            max,
            step,
            default,
        } => ElementDocument::Slider {
            text,
            min,
            max,
            step,
            default,
        },
        Element::Dropdown {
            text,
            options,
            default_index,
        } => ElementDocument::Dropdown {
            text,
            default: default_index,
            options,
        },
        Element::StepSlider {
            text,
            options,
            default_index,
        } => ElementDocument::StepSlider {
            text,
            default: default_index,
            steps: options,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{CustomForm, MenuForm, ModalForm};
    use serde_json::{Value, json};

    fn to_value(form: impl Into<Form>) -> Value {
        serde_json::from_slice(&to_payload(&form.into()).unwrap()).unwrap()
    }

    #[test]
    fn test_modal_document() {
        let modal = ModalForm::new("Confirm", "Are you sure?", "Yes", "No", |_| Ok(()));

        assert_eq!(
            to_value(modal),
            json!({
                "type": "modal",
                "title": "Confirm",
                "content": "Are you sure?",
                "button1": "Yes",
                "button2": "No",
            })
        );
    }

    #[test]
    fn test_menu_document_image_kinds() {
        let menu = MenuForm::new("Shop", "Buy something", |_| Ok(()))
            .with_button(Button::new("Plain"))
            .with_button(Button::new("Remote").with_image("https://example.com/sword.png"))
            .with_button(Button::new("Insecure").with_image("http://example.com/bow.png"))
            .with_button(Button::new("Local").with_image("textures/items/apple"));

        assert_eq!(
            to_value(menu),
            json!({
                "type": "form",
                "title": "Shop",
                "content": "Buy something",
                "buttons": [
                    {"text": "Plain"},
                    {"text": "Remote", "image": {"type": "url", "data": "https://example.com/sword.png"}},
                    {"text": "Insecure", "image": {"type": "url", "data": "http://example.com/bow.png"}},
                    {"text": "Local", "image": {"type": "path", "data": "textures/items/apple"}},
                ],
            })
        );
    }

    #[test]
    fn test_custom_document_elements() {
        let custom = CustomForm::new("Settings", |_| Ok(()))
            .with_element(Element::toggle("PvP", true))
            .with_element(Element::input("Name", "Steve", "Your name"))
            .with_element(Element::label("Hello"))
            .with_element(Element::slider("Volume", 0.0, 10.0, 0.5, 2.5))
            .with_element(Element::dropdown("Mode", ["Easy", "Hard"], 1))
            .with_element(Element::step_slider("Speed", ["Slow", "Fast"], 0));

        assert_eq!(
            to_value(custom),
            json!({
                "type": "custom_form",
                "title": "Settings",
                "content": [
                    {"type": "toggle", "text": "PvP", "default": true},
                    {"type": "input", "text": "Name", "default": "Steve", "placeholder": "Your name"},
                    {"type": "label", "text": "Hello"},
                    {"type": "slider", "text": "Volume", "min": 0.0, "max": 10.0, "step": 0.5, "default": 2.5},
                    {"type": "dropdown", "text": "Mode", "default": 1, "options": ["Easy", "Hard"]},
                    {"type": "step_slider", "text": "Speed", "default": 0, "steps": ["Slow", "Fast"]},
                ],
            })
        );
    }

    #[test]
    fn test_empty_custom_form_has_empty_content() {
        let custom = CustomForm::new("Empty", |_| Ok(()));
        assert_eq!(to_value(custom)["content"], json!([]));
    }

    #[test]
    fn test_default_response_is_accepted_by_form() {
        let custom = Form::from(
            CustomForm::new("Settings", |_| Ok(()))
                .with_element(Element::label("Hello"))
                .with_element(Element::toggle("PvP", true))
                .with_element(Element::slider("Volume", 0.0, 10.0, 0.5, 2.5))
                .with_element(Element::step_slider("Speed", ["Slow", "Fast"], 1)),
        );

        let answer = encode(&custom).default_response();
        assert_eq!(answer, json!([null, true, 2.5, 1]));
        custom.submit(answer.to_string().as_bytes()).unwrap();

        let empty_menu = Form::from(MenuForm::new("Nothing", "", |_| Ok(())));
        assert_eq!(encode(&empty_menu).default_response(), Value::Null);
    }

    #[test]
    fn test_client_reads_back_document() {
        let menu = Form::from(
            MenuForm::new("Warp", "Where to?", |_| Ok(()))
                .with_button(Button::new("Spawn").with_image("https://example.com/spawn.png")),
        );

        let payload = to_payload(&menu).unwrap();
        let decoded: Document = serde_json::from_slice(&payload).unwrap();

        assert_eq!(decoded, encode(&menu));
        let Document::Menu { buttons, .. } = decoded else {
            panic!("expected a menu document");
        };
        assert_eq!(buttons[0].image.as_ref().unwrap().kind, ImageKind::Url);
    }
}

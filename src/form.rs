//! Form values sent to a remote client and the typed handlers that consume its answers.

mod element;
mod errors;

pub use element::{Element, ElementValue};
pub use errors::SubmitError;

use std::{fmt, sync::Arc};

use serde_json::Value;

/// Callback invoked with the decoded client response of a form.
pub type Handler<T> = Arc<dyn Fn(T) -> color_eyre::Result<()> + Send + Sync>;

/// A form awaiting display on the client.
#[derive(Debug, Clone)]
pub enum Form {
    Custom(CustomForm),
    Menu(MenuForm),
    Modal(ModalForm),
}

impl Form {
    pub fn title(&self) -> &str {
        match self {
            Self::Custom(form) => &form.title,
            Self::Menu(form) => &form.title,
            Self::Modal(form) => &form.title,
        }
    }

    /// Decodes the raw client response and passes it to the form's handler.
    ///
    /// Cancellation (empty or `null` responses) is filtered out by the session
    /// before this is reached.
    pub fn submit(&self, response: &[u8]) -> Result<(), SubmitError> {
        match self {
            Self::Custom(form) => form.submit(response),
            Self::Menu(form) => form.submit(response),
            Self::Modal(form) => form.submit(response),
        }
    }
}

impl From<CustomForm> for Form {
    fn from(form: CustomForm) -> Self {
        Self::Custom(form)
    }
}

impl From<MenuForm> for Form {
    fn from(form: MenuForm) -> Self {
        Self::Menu(form)
    }
}

impl From<ModalForm> for Form {
    fn from(form: ModalForm) -> Self {
        Self::Modal(form)
    }
}

fn handle<T>(handler: &Handler<T>, value: T) -> Result<(), SubmitError> {
    handler(value).map_err(SubmitError::Handler)
}

/// A form made of arbitrary elements, answered with one value per element.
#[derive(Clone)]
pub struct CustomForm {
    title: String,
    elements: Vec<Element>,
    on_submit: Handler<Vec<ElementValue>>,
}

impl CustomForm {
    pub fn new<F>(title: impl Into<String>, on_submit: F) -> Self
    where
        F: Fn(Vec<ElementValue>) -> color_eyre::Result<()> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            elements: Vec::new(),
            on_submit: Arc::new(on_submit),
        }
    }

    /// Appends an element; elements are shown in insertion order.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn submit(&self, response: &[u8]) -> Result<(), SubmitError> {
        let values: Vec<Value> = serde_json::from_slice(response)?;
        if values.len() != self.elements.len() {
            return Err(SubmitError::ElementCount {
                expected: self.elements.len(),
                actual: values.len(),
            });
        }

        let parsed = self
            .elements
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (element, value))| element.parse_value(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        handle(&self.on_submit, parsed)
    }
}

impl fmt::Debug for CustomForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomForm")
            .field("title", &self.title)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

/// A clickable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    /// Either a URL (`http:`/`https:`) or a client resource path.
    pub image: Option<String>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// The button chosen by the client in a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSelection {
    pub index: usize,
    pub button: Button,
}

/// A list of buttons under a body text.
#[derive(Clone)]
pub struct MenuForm {
    title: String,
    body: String,
    buttons: Vec<Button>,
    on_submit: Handler<MenuSelection>,
}

impl MenuForm {
    pub fn new<F>(title: impl Into<String>, body: impl Into<String>, on_submit: F) -> Self
    where
        F: Fn(MenuSelection) -> color_eyre::Result<()> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            body: body.into(),
            buttons: Vec::new(),
            on_submit: Arc::new(on_submit),
        }
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    fn submit(&self, response: &[u8]) -> Result<(), SubmitError> {
        let selected: u64 = serde_json::from_slice(response)?;
        let index = element::checked_index(selected, self.buttons.len())?;
        let button = self.buttons[index].clone();

        handle(&self.on_submit, MenuSelection { index, button })
    }
}

impl fmt::Debug for MenuForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuForm")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("buttons", &self.buttons)
            .finish_non_exhaustive()
    }
}

/// A yes/no question with exactly two buttons.
#[derive(Clone)]
pub struct ModalForm {
    title: String,
    body: String,
    button1: String,
    button2: String,
    on_submit: Handler<bool>,
}

impl ModalForm {
    /// Creates a modal; the handler receives `true` when `button1` was pressed.
    pub fn new<F>(
        title: impl Into<String>,
        body: impl Into<String>,
        button1: impl Into<String>,
        button2: impl Into<String>,
        on_submit: F,
    ) -> Self
    where
        F: Fn(bool) -> color_eyre::Result<()> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            body: body.into(),
            button1: button1.into(),
            button2: button2.into(),
            on_submit: Arc::new(on_submit),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn buttons(&self) -> [&str; 2] {
        [&self.button1, &self.button2]
    }

    fn submit(&self, response: &[u8]) -> Result<(), SubmitError> {
        let confirmed: bool = serde_json::from_slice(response)?;
        handle(&self.on_submit, confirmed)
    }
}

impl fmt::Debug for ModalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalForm")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("button1", &self.button1)
            .field("button2", &self.button2)
            .finish_non_exhaustive()
    }
}

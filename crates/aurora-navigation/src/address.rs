//! Address bar state

use crate::input::InputResolver;

/// Text shown in the address bar plus the resolver used on submit.
#[derive(Debug, Clone, Default)]
pub struct AddressBar {
    resolver: InputResolver,
    text: String,
}

impl AddressBar {
    pub fn new(resolver: InputResolver) -> Self {
        Self {
            resolver,
            text: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Show the active context's URL.
    pub fn reflect(&mut self, url: &str) {
        self.text = url.to_string();
    }

    /// Resolve `input` into the URL to load.
    ///
    /// The bar keeps the typed text; it is overwritten once the engine
    /// reports the new URL through [`AddressBar::reflect`].
    pub fn submit(&mut self, input: &str) -> String {
        self.text = input.to_string();
        self.resolver.resolve(input)
    }

    pub fn resolver(&self) -> &InputResolver {
        &self.resolver
    }
}

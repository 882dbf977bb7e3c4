//! Prompt materialization.
//!
//! A [`PromptTemplate`] is compiled at registration into literal and
//! argument chunks, the same representation idea the resolver uses for
//! uris. Rendering substitutes bound arguments into the text and wraps
//! it in a single user-role message. Required-argument presence is the
//! validator's job; by the time a template renders, required fields are
//! guaranteed present, and absent optional ones render empty.

use serde_json::Value;

use crate::model::{GetPromptResult, JsonObject, PromptMessage, Role};

/// A compiled prompt template with `{name}` argument references.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq)]
enum Chunk {
    Literal(String),
    Argument(String),
}

/// Why a prompt template failed to compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PromptTemplateError {
    #[error("unclosed argument brace")]
    UnclosedBrace,
    #[error("empty argument name")]
    EmptyArgument,
}

impl PromptTemplate {
    /// Compile template text. `{{` and `}}` escape literal braces.
    pub fn parse(text: &str) -> Result<Self, PromptTemplateError> {
        let mut chunks = Vec::new();
        let mut literal = String::new();
        let mut rest = text.chars().peekable();
        while let Some(c) = rest.next() {
            match c {
                '{' if rest.peek() == Some(&'{') => {
                    rest.next();
                    literal.push('{');
                }
                '}' if rest.peek() == Some(&'}') => {
                    rest.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match rest.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(PromptTemplateError::UnclosedBrace),
                        }
                    }
                    if name.is_empty() {
                        return Err(PromptTemplateError::EmptyArgument);
                    }
                    if !literal.is_empty() {
                        chunks.push(Chunk::Literal(std::mem::take(&mut literal)));
                    }
                    chunks.push(Chunk::Argument(name));
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            chunks.push(Chunk::Literal(literal));
        }
        Ok(Self { chunks })
    }

    /// Names of the arguments the template references.
    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().filter_map(|chunk| match chunk {
            Chunk::Argument(name) => Some(name.as_str()),
            Chunk::Literal(_) => None,
        })
    }

    /// Substitute `arguments` into the template text.
    ///
    /// String values are inserted as-is, other values as their json
    /// text; absent arguments render as the empty string.
    pub fn render(&self, arguments: &JsonObject) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            match chunk {
                Chunk::Literal(text) => out.push_str(text),
                Chunk::Argument(name) => match arguments.get(name) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(value) => out.push_str(&value.to_string()),
                    None => {}
                },
            }
        }
        out
    }

    /// Render into the prompt result shape: one user-role text message.
    pub fn materialize(&self, arguments: &JsonObject) -> GetPromptResult {
        GetPromptResult {
            description: None,
            messages: vec![PromptMessage::new_text(Role::User, self.render(arguments))],
        }
    }
}

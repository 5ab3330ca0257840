use crate::tokenizer::tokenize;

/// A named attribute of a news item and whether its text goes through the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub tokenize: bool,
}

/// Every field indexed in multifield mode, in indexing order.
pub const FIELDS: [Field; 5] = [
    Field { name: "title", tokenize: true },
    Field { name: "date", tokenize: false },
    Field { name: "keywords", tokenize: true },
    Field { name: "article", tokenize: true },
    Field { name: "summary", tokenize: true },
];

/// Field used by unqualified query operands.
pub const DEFAULT_FIELD: &str = "article";

pub fn field(name: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.name == name)
}

impl Field {
    /// Terms to index for this field's content. Non-tokenized fields yield the raw value.
    pub fn terms(&self, text: &str) -> Vec<String> {
        if self.tokenize {
            tokenize(text)
        } else {
            vec![text.to_string()]
        }
    }

    /// Normalize a term typed in a query so it matches what indexing produced.
    pub fn query_term(&self, term: &str) -> String {
        if self.tokenize {
            term.to_lowercase()
        } else {
            term.to_string()
        }
    }
}

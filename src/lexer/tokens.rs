use lazy_static::lazy_static;
use serde::Serialize;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, Keyword> = {
        let mut map = HashMap::new();
        map.insert("return", Keyword::Return);
        map.insert("const", Keyword::Const);
        map.insert("await", Keyword::Await);
        map.insert("import", Keyword::Import);
        map.insert("func", Keyword::Func);
        map.insert("if", Keyword::If);
        map.insert("else", Keyword::Else);
        map.insert("while", Keyword::While);
        map
    };

    /// Every operator the scanner recognizes. Lookups pick the longest match.
    pub static ref OPERATOR_LOOKUP: Vec<(&'static str, Operator)> = vec![
        ("==", Operator::Equals),
        ("!=", Operator::NotEquals),
        ("<=", Operator::LessEquals),
        (">=", Operator::GreaterEquals),
        ("<", Operator::Less),
        (">", Operator::Greater),
        ("+=", Operator::AddAssign),
        ("-=", Operator::SubAssign),
        ("*=", Operator::MulAssign),
        ("/=", Operator::DivAssign),
        ("+", Operator::Add),
        ("-", Operator::Sub),
        ("*", Operator::Mul),
        ("/", Operator::Div),
        ("%", Operator::Mod),
        ("=", Operator::Assign),
        ("!", Operator::Not),
        ("||", Operator::Or),
        ("&&", Operator::And),
    ];
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Return,
    Const,
    Await,
    Import,
    Func,
    If,
    Else,
    While,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = RESERVED_LOOKUP
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map(|(word, _)| *word)
            .unwrap_or("?");
        write!(f, "{}", word)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "<=")]
    LessEquals,
    #[serde(rename = ">=")]
    GreaterEquals,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubAssign,
    #[serde(rename = "*=")]
    MulAssign,
    #[serde(rename = "/=")]
    DivAssign,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        OPERATOR_LOOKUP
            .iter()
            .find(|(_, op)| op == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }

    /// Operators that may appear between the target and the value of an
    /// assignment statement.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::AddAssign
                | Operator::SubAssign
                | Operator::MulAssign
                | Operator::DivAssign
        )
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Not | Operator::Sub)
    }

    /// The binary operator a compound assignment applies, `+=` -> `+`.
    pub fn compound_base(&self) -> Option<Operator> {
        match self {
            Operator::AddAssign => Some(Operator::Add),
            Operator::SubAssign => Some(Operator::Sub),
            Operator::MulAssign => Some(Operator::Mul),
            Operator::DivAssign => Some(Operator::Div),
            _ => None,
        }
    }

    /// JavaScript spelling of the operator. Equality is always strict.
    pub fn to_js(&self) -> &'static str {
        match self {
            Operator::Equals => "===",
            Operator::NotEquals => "!==",
            other => other.as_str(),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the longest operator starting at `pos`, if any.
pub fn match_operator(chars: &[char], pos: usize) -> Option<Operator> {
    let mut found: Option<(&str, Operator)> = None;

    for (text, op) in OPERATOR_LOOKUP.iter() {
        let matches = text
            .chars()
            .enumerate()
            .all(|(i, c)| chars.get(pos + i) == Some(&c));

        if matches && found.map_or(true, |(best, _)| text.len() > best.len()) {
            found = Some((text, *op));
        }
    }

    found.map(|(_, op)| op)
}

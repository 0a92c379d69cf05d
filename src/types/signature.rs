use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double",
];

/// Reference to a type as it appears in a declaration.
///
/// Manifests spell types in their signature form:
///
/// ```text
/// int
/// long[]
/// java.lang.String
/// java.util.List<com.example.Person>
/// T                      // type variable of the enclosing declaration
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// Primitive value type (`int`, `boolean`, ...)
    Primitive(String),

    /// `void`
    Void,

    /// Array of the element type
    Array(Box<TypeRef>),

    /// Class or interface, with its type arguments
    Declared { name: String, args: Vec<TypeRef> },

    /// Type variable `name` introduced by the generic declaration `owner`
    Var { name: String, owner: String },
}

impl TypeRef {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeRef::Primitive(name.into())
    }

    pub fn simple(name: impl Into<String>) -> Self {
        TypeRef::Declared {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn declared(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Declared {
            name: name.into(),
            args,
        }
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn var(name: impl Into<String>, owner: impl Into<String>) -> Self {
        TypeRef::Var {
            name: name.into(),
            owner: owner.into(),
        }
    }

    pub fn parse(signature: &str) -> Result<Self, SignatureError> {
        SignatureParser::new(signature).parse()
    }

    /// Name of the declared type, without arguments
    pub fn erasure(&self) -> Option<&str> {
        match self {
            TypeRef::Declared { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Declared { args, .. } => args,
            _ => &[],
        }
    }

    /// Rewrites bare references to `params` into type variables owned by `owner`.
    pub fn link_vars(&self, params: &[String], owner: &str) -> TypeRef {
        match self {
            TypeRef::Declared { name, args } if args.is_empty() && params.contains(name) => {
                TypeRef::var(name.clone(), owner)
            }
            TypeRef::Declared { name, args } => TypeRef::declared(
                name.clone(),
                args.iter().map(|a| a.link_vars(params, owner)).collect(),
            ),
            TypeRef::Array(element) => TypeRef::array(element.link_vars(params, owner)),
            other => other.clone(),
        }
    }

    /// Replaces the variables of `owner` by the matching entries of `args`.
    pub fn substitute(&self, owner: &str, params: &[String], args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::Var { name, owner: var_owner } if var_owner == owner => params
                .iter()
                .position(|p| p == name)
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Declared { name, args: inner } => TypeRef::declared(
                name.clone(),
                inner
                    .iter()
                    .map(|a| a.substitute(owner, params, args))
                    .collect(),
            ),
            TypeRef::Array(element) => TypeRef::array(element.substitute(owner, params, args)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(name) => write!(f, "{}", name),
            TypeRef::Void => write!(f, "void"),
            TypeRef::Array(element) => write!(f, "{}[]", element),
            TypeRef::Declared { name, args } if args.is_empty() => write!(f, "{}", name),
            TypeRef::Declared { name, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}<{}>", name, args.join(", "))
            }
            TypeRef::Var { name, .. } => write!(f, "{}", name),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("empty type signature")]
    Empty,

    #[error("unexpected `{found}` at position {position} in `{signature}`")]
    Unexpected {
        found: char,
        position: usize,
        signature: String,
    },

    #[error("unexpected end of `{signature}`")]
    UnexpectedEnd { signature: String },
}

struct SignatureParser {
    input: Vec<char>,
    position: usize,
}

impl SignatureParser {
    fn new(signature: &str) -> Self {
        SignatureParser {
            input: signature.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn unexpected(&self) -> SignatureError {
        let signature: String = self.input.iter().collect();
        match self.current_char() {
            Some(found) => SignatureError::Unexpected {
                found,
                position: self.position,
                signature,
            },
            None => SignatureError::UnexpectedEnd { signature },
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SignatureError> {
        self.skip_whitespace();
        if self.current_char() != Some(expected) {
            return Err(self.unexpected());
        }
        self.advance();
        Ok(())
    }

    fn parse(&mut self) -> Result<TypeRef, SignatureError> {
        self.skip_whitespace();
        if self.current_char().is_none() {
            return Err(SignatureError::Empty);
        }
        let ty = self.parse_type()?;
        self.skip_whitespace();
        if self.current_char().is_some() {
            return Err(self.unexpected());
        }
        Ok(ty)
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '.' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    fn parse_type(&mut self) -> Result<TypeRef, SignatureError> {
        self.skip_whitespace();

        // `?` and `? extends X` collapse to their bound
        if self.current_char() == Some('?') {
            self.advance();
            self.skip_whitespace();
            let bound = self.read_name();
            return match bound.as_str() {
                "" => Ok(TypeRef::simple("java.lang.Object")),
                "extends" => self.parse_type(),
                _ => Err(self.unexpected()),
            };
        }

        let name = self.read_name();
        if name.is_empty() {
            return Err(self.unexpected());
        }

        let mut ty = if name == "void" {
            TypeRef::Void
        } else if PRIMITIVES.contains(&name.as_str()) {
            TypeRef::Primitive(name)
        } else {
            let mut args = Vec::new();
            self.skip_whitespace();
            if self.current_char() == Some('<') {
                self.advance();
                args.push(self.parse_type()?);
                self.skip_whitespace();
                while self.current_char() == Some(',') {
                    self.advance();
                    args.push(self.parse_type()?);
                    self.skip_whitespace();
                }
                self.expect('>')?;
            }
            TypeRef::Declared { name, args }
        };

        loop {
            self.skip_whitespace();
            if self.current_char() != Some('[') {
                break;
            }
            self.advance();
            self.expect(']')?;
            ty = TypeRef::array(ty);
        }
        Ok(ty)
    }
}

#[test]
fn test_parse_signatures() {
    assert_eq!(TypeRef::parse("int").unwrap(), TypeRef::primitive("int"));
    assert_eq!(
        TypeRef::parse("java.util.List<a.Person>").unwrap(),
        TypeRef::declared("java.util.List", vec![TypeRef::simple("a.Person")])
    );
    assert_eq!(
        TypeRef::parse("long[][]").unwrap(),
        TypeRef::array(TypeRef::array(TypeRef::primitive("long")))
    );
    assert_eq!(
        TypeRef::parse("java.util.Map<String, ? extends a.B>").unwrap().args()[1],
        TypeRef::simple("a.B")
    );
    assert!(TypeRef::parse("List<a.B").is_err());
    assert_eq!(TypeRef::parse("  "), Err(SignatureError::Empty));
}

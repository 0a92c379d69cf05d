use thiserror::Error;

use crate::{
    ast::{Comparator, OperationKind, Token, TokenKind},
    naming::split_camel,
};

/// Keyword vocabulary, longest (in camel words) first.
const KEYWORDS: &[(&str, usize, TokenKind)] = &[
    ("GreaterThanEqual", 3, TokenKind::Comparator(Comparator::GreaterThanEqual)),
    ("LessThanEqual", 3, TokenKind::Comparator(Comparator::LessThanEqual)),
    ("IsNotNull", 3, TokenKind::Comparator(Comparator::IsNotNull)),
    ("GreaterThan", 2, TokenKind::Comparator(Comparator::GreaterThan)),
    ("LessThan", 2, TokenKind::Comparator(Comparator::LessThan)),
    ("NotLike", 2, TokenKind::Comparator(Comparator::NotLike)),
    ("NotIn", 2, TokenKind::Comparator(Comparator::NotIn)),
    ("IsNull", 2, TokenKind::Comparator(Comparator::IsNull)),
    ("StartingWith", 2, TokenKind::Comparator(Comparator::StartingWith)),
    ("EndingWith", 2, TokenKind::Comparator(Comparator::EndingWith)),
    ("OrderBy", 2, TokenKind::OrderBy),
    ("By", 1, TokenKind::By),
    ("And", 1, TokenKind::And),
    ("Or", 1, TokenKind::Or),
    ("Asc", 1, TokenKind::Asc),
    ("Desc", 1, TokenKind::Desc),
    ("All", 1, TokenKind::All),
    ("Selective", 1, TokenKind::Selective),
    ("Like", 1, TokenKind::Comparator(Comparator::Like)),
    ("In", 1, TokenKind::Comparator(Comparator::In)),
    ("Between", 1, TokenKind::Comparator(Comparator::Between)),
    ("Not", 1, TokenKind::Comparator(Comparator::Not)),
    ("Containing", 1, TokenKind::Comparator(Comparator::Containing)),
];

/// The method name cannot be derived into a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("empty method name")]
    Empty,

    #[error(
        "`{name}` does not start with an operation keyword \
         (find, get, count, exists, delete, insert, update, page)"
    )]
    MissingOperation { name: String },
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    offset: usize,
    separator: bool,
}

/// Splits a method name into tokens.
///
/// Each lexer is created for one name and holds no shared state.
pub struct Lexer {
    name: String,
    words: Vec<Word>,
    position: usize,
    length: usize,
}

impl Lexer {
    pub fn new(name: &str) -> Self {
        let mut words = Vec::new();
        let mut offset = 0;

        for (index, part) in name.split('_').enumerate() {
            if index > 0 {
                words.push(Word {
                    text: "_".to_string(),
                    offset: offset - 1,
                    separator: true,
                });
            }
            for (start, text) in split_camel(part) {
                words.push(Word {
                    text,
                    offset: offset + start,
                    separator: false,
                });
            }
            offset += part.chars().count() + 1;
        }

        Lexer {
            name: name.to_string(),
            words,
            position: 0,
            length: name.chars().count(),
        }
    }

    fn current_word(&self) -> Option<&Word> {
        self.words.get(self.position)
    }

    /// Matches the longest keyword starting at word `index`.
    fn keyword_at(&self, index: usize) -> Option<(usize, TokenKind)> {
        KEYWORDS.iter().find_map(|(text, count, kind)| {
            let words = self.words.get(index..index + count)?;
            if words.iter().any(|w| w.separator) {
                return None;
            }
            let joined: String = words.iter().map(|w| w.text.as_str()).collect();
            (joined == *text).then_some((*count, *kind))
        })
    }

    fn read_operation(&mut self) -> Result<Token, LexError> {
        let word = match self.current_word() {
            Some(word) => word,
            None => return Err(LexError::Empty),
        };

        match OperationKind::from_keyword(&word.text).filter(|_| !word.separator) {
            Some(op) => {
                let token = Token::new(TokenKind::Operation(op), word.text.clone(), word.offset);
                self.position += 1;
                Ok(token)
            }
            None => Err(LexError::MissingOperation {
                name: self.name.clone(),
            }),
        }
    }

    fn read_property(&mut self) -> Token {
        let offset = self.words[self.position].offset;
        let mut text = String::new();

        while let Some(word) = self.current_word() {
            if word.separator || self.keyword_at(self.position).is_some() {
                break;
            }
            text.push_str(&word.text);
            self.position += 1;
        }

        Token::new(TokenKind::Property, text, offset)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.position == 0 {
            return self.read_operation();
        }

        let word = match self.current_word() {
            None => return Ok(Token::eof(self.length)),
            Some(word) => word.clone(),
        };

        if word.separator {
            self.position += 1;
            return Ok(Token::new(TokenKind::PathSeparator, word.text, word.offset));
        }

        match self.keyword_at(self.position) {
            Some((count, kind)) => {
                let text: String = self.words[self.position..self.position + count]
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect();
                self.position += count;
                Ok(Token::new(kind, text, word.offset))
            }
            None => Ok(self.read_property()),
        }
    }

    /// Collects every token up to and including `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_keywords() {
    let tokens = Lexer::new("findByAgeGreaterThanEqualOrderByIdDesc")
        .tokenize()
        .unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Operation(OperationKind::Find),
            TokenKind::By,
            TokenKind::Property,
            TokenKind::Comparator(Comparator::GreaterThanEqual),
            TokenKind::OrderBy,
            TokenKind::Property,
            TokenKind::Desc,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("findByFirstName");
    assert_eq!(lexer.next_token().unwrap().position, 0);
    assert_eq!(lexer.next_token().unwrap().position, 4);
    let property = lexer.next_token().unwrap();
    assert_eq!(property.text, "FirstName");
    assert_eq!(property.position, 6);
    assert_eq!(lexer.next_token().unwrap(), Token::eof(15));
}

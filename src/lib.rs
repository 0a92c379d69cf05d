pub mod ast;
pub mod binder;
pub mod config;
pub mod generator;
pub mod lexer;
pub mod mapper;
pub mod naming;
pub mod output;
pub mod parser;
pub mod translator;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Predicate, Query, Token};
pub use binder::{BindError, MethodBinder, MethodInfo, Param, Return};
pub use config::{ConfigError, Manifest, MapperConfig};
pub use generator::{GenerateError, GenerationReport, generate};
pub use lexer::{LexError, Lexer};
pub use mapper::{DerivedMethod, SkipReason, SkippedMethod};
pub use naming::{NamingConverter, NamingStyle};
pub use output::{OutputFormat, to_json, to_json_pretty};
pub use parser::{ParseError, Parser, parse_method_name};
pub use translator::{
    IdSnapshot, MappedStatement, SqlTranslator, StatementDocument, TranslateError,
    TranslateOutcome, Translator,
};
pub use types::{TypeDescriptor, TypeRef, TypeResolver, TypeSystem, TypeTable};

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Statement element a mapped statement is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Insert,
    Delete,
    Update,
    Select,
}

impl StatementKind {
    pub fn tag(self) -> &'static str {
        match self {
            StatementKind::Insert => "insert",
            StatementKind::Delete => "delete",
            StatementKind::Update => "update",
            StatementKind::Select => "select",
        }
    }
}

/// One statement of a document, derived or hand-written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedStatement {
    /// Method name the statement is bound to
    pub id: String,

    pub kind: StatementKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,

    /// Bean property receiving the generated key of an insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_property: Option<String>,

    /// Produced by derivation rather than written by hand
    #[serde(default)]
    pub generated: bool,

    #[serde(default)]
    pub body: Vec<SqlFragment>,
}

impl MappedStatement {
    pub fn new(id: impl Into<String>, kind: StatementKind) -> Self {
        MappedStatement {
            id: id.into(),
            kind,
            parameter_type: None,
            result_type: None,
            key_property: None,
            generated: false,
            body: Vec::new(),
        }
    }

    /// Body rendered in dynamic-SQL tag form.
    pub fn sql(&self) -> String {
        render_all(&self.body)
    }

    /// The complete statement element, attributes included.
    pub fn render(&self) -> String {
        let tag = self.kind.tag();
        let mut out = format!("<{} id=\"{}\"", tag, escape_attr(&self.id));
        let attrs = [
            ("parameterType", &self.parameter_type),
            ("resultType", &self.result_type),
        ];
        for (name, value) in attrs {
            if let Some(value) = value {
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
        }
        if let Some(key) = &self.key_property {
            let _ = write!(out, " useGeneratedKeys=\"true\" keyProperty=\"{}\"", escape_attr(key));
        }
        let _ = write!(out, ">{}</{}>", self.sql(), tag);
        out
    }
}

/// Node of a statement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SqlFragment {
    /// Literal SQL
    Text { text: String },

    /// Bound value, rendered `#{name}`
    Param { name: String },

    /// Body included only when `test` holds
    If { test: String, body: Vec<SqlFragment> },

    /// Body wrapped in `prefix`/`suffix` once leading and trailing overrides
    /// are stripped; nothing is emitted for an empty body
    Trim {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        prefix: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        suffix: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        prefix_overrides: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        suffix_overrides: Vec<String>,
        body: Vec<SqlFragment>,
    },

    /// Body repeated for each element of `collection`, bound as `item`
    ForEach {
        collection: String,
        item: String,
        #[serde(default)]
        open: String,
        #[serde(default)]
        separator: String,
        #[serde(default)]
        close: String,
        body: Vec<SqlFragment>,
    },
}

impl SqlFragment {
    pub fn text(text: impl Into<String>) -> Self {
        SqlFragment::Text { text: text.into() }
    }

    pub fn param(name: impl Into<String>) -> Self {
        SqlFragment::Param { name: name.into() }
    }

    pub fn if_(test: impl Into<String>, body: Vec<SqlFragment>) -> Self {
        SqlFragment::If {
            test: test.into(),
            body,
        }
    }

    pub fn render(&self) -> String {
        match self {
            SqlFragment::Text { text } => escape_text(text),
            SqlFragment::Param { name } => format!("#{{{}}}", name),
            SqlFragment::If { test, body } => {
                format!("<if test=\"{}\">{}</if>", escape_attr(test), render_all(body))
            }
            SqlFragment::Trim {
                prefix,
                suffix,
                prefix_overrides,
                suffix_overrides,
                body,
            } => {
                let mut out = String::from("<trim");
                push_attr(&mut out, "prefix", prefix);
                push_attr(&mut out, "suffix", suffix);
                push_attr(&mut out, "prefixOverrides", &prefix_overrides.join("|"));
                push_attr(&mut out, "suffixOverrides", &suffix_overrides.join("|"));
                let _ = write!(out, ">{}</trim>", render_all(body));
                out
            }
            SqlFragment::ForEach {
                collection,
                item,
                open,
                separator,
                close,
                body,
            } => {
                let mut out = String::from("<foreach");
                push_attr(&mut out, "collection", collection);
                push_attr(&mut out, "item", item);
                push_attr(&mut out, "open", open);
                push_attr(&mut out, "separator", separator);
                push_attr(&mut out, "close", close);
                let _ = write!(out, ">{}</foreach>", render_all(body));
                out
            }
        }
    }
}

/// Appends `fragment`, merging adjacent text.
pub(crate) fn push(body: &mut Vec<SqlFragment>, fragment: SqlFragment) {
    if let SqlFragment::Text { text } = &fragment
        && let Some(SqlFragment::Text { text: last }) = body.last_mut()
    {
        last.push_str(text);
        return;
    }
    body.push(fragment);
}

pub(crate) fn push_text(body: &mut Vec<SqlFragment>, text: &str) {
    if !text.is_empty() {
        push(body, SqlFragment::text(text));
    }
}

fn render_all(body: &[SqlFragment]) -> String {
    body.iter().map(SqlFragment::render).collect()
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

pub(crate) fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[test]
fn test_render_fragments() {
    let body = vec![
        SqlFragment::text("SELECT * FROM person WHERE age < "),
        SqlFragment::param("age"),
        SqlFragment::if_(
            "name != null",
            vec![SqlFragment::text(" AND name = "), SqlFragment::param("name")],
        ),
    ];
    let mut statement = MappedStatement::new("findByAgeLessThan", StatementKind::Select);
    statement.body = body;
    assert_eq!(
        statement.sql(),
        "SELECT * FROM person WHERE age &lt; #{age}<if test=\"name != null\"> AND name = #{name}</if>"
    );
    assert!(statement.render().starts_with("<select id=\"findByAgeLessThan\">"));
}

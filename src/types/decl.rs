use serde::{Deserialize, Serialize};

use crate::types::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    #[default]
    Class,
    Interface,
}

/// Declaration of a class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Qualified name
    pub name: String,

    #[serde(default)]
    pub kind: DeclKind,

    /// Names of the declared type parameters, in order
    #[serde(default)]
    pub type_params: Vec<String>,

    #[serde(default)]
    pub superclass: Option<TypeRef>,

    #[serde(default)]
    pub interfaces: Vec<TypeRef>,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,

    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn class(name: impl Into<String>) -> Self {
        TypeDecl {
            name: name.into(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        TypeDecl {
            kind: DeclKind::Interface,
            ..TypeDecl::class(name)
        }
    }

    pub fn type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds `get<Name>` for `name`.
    pub fn getter(self, name: &str, ty: TypeRef) -> Self {
        self.method(MethodDecl::new(format!("get{}", capitalize(name)), ty))
    }

    /// Adds `set<Name>` for `name`.
    pub fn setter(self, name: &str, ty: TypeRef) -> Self {
        self.method(
            MethodDecl::new(format!("set{}", capitalize(name)), TypeRef::Void)
                .param(ParamDecl::new(name, ty)),
        )
    }

    /// Adds a field together with its getter and setter.
    pub fn property(self, name: &str, ty: TypeRef) -> Self {
        self.field(FieldDecl::new(name, ty.clone()))
            .getter(name, ty.clone())
            .setter(name, ty)
    }

    /// Turns bare references to the declaration's own type parameters into
    /// type variables owned by it.
    pub fn linked(mut self) -> Self {
        if self.type_params.is_empty() {
            return self;
        }
        let params = self.type_params.clone();
        let owner = self.name.clone();
        let link = |ty: &TypeRef| ty.link_vars(&params, &owner);

        self.superclass = self.superclass.as_ref().map(link);
        self.interfaces = self.interfaces.iter().map(link).collect();
        for field in &mut self.fields {
            field.ty = link(&field.ty);
        }
        for method in &mut self.methods {
            method.returns = link(&method.returns);
            for param in &mut method.params {
                param.ty = link(&param.ty);
            }
        }
        self
    }
}

/// Field of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// Explicit column name, bypassing naming conversion
    #[serde(default)]
    pub column: Option<String>,

    /// Value is generated by the database on insert
    #[serde(default)]
    pub generated_key: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDecl {
            name: name.into(),
            ty,
            column: None,
            generated_key: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn generated_key(mut self) -> Self {
        self.generated_key = true;
        self
    }
}

/// Method of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,

    #[serde(default)]
    pub params: Vec<ParamDecl>,

    #[serde(default = "void")]
    pub returns: TypeRef,

    #[serde(default, rename = "static")]
    pub is_static: bool,

    #[serde(default, rename = "default")]
    pub is_default: bool,

    #[serde(default, rename = "native")]
    pub is_native: bool,

    /// Hand-written statement attached to the method; such methods are never derived
    #[serde(default)]
    pub statement: Option<String>,
}

fn void() -> TypeRef {
    TypeRef::Void
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, returns: TypeRef) -> Self {
        MethodDecl {
            name: name.into(),
            params: Vec::new(),
            returns,
            is_static: false,
            is_default: false,
            is_native: false,
            statement: None,
        }
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Parameter types, used to tell overloads apart
    pub fn signature(&self) -> Vec<&TypeRef> {
        self.params.iter().map(|p| &p.ty).collect()
    }
}

/// Method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// Exposed parameter name, replacing the declared identifier
    #[serde(default)]
    pub alias: Option<String>,

    /// Explicit column name, bypassing naming conversion
    #[serde(default)]
    pub column: Option<String>,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        ParamDecl {
            name: name.into(),
            ty,
            alias: None,
            column: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

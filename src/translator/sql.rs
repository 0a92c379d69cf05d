use crate::{
    ast::{
        Comparator, Condition, LogicOp, OperationKind, OrderBy, Predicate, PredicateGroup,
        PropertyPath, Query,
    },
    binder::{MethodInfo, Param},
    naming::NamingConverter,
    translator::{
        MappedStatement, SqlFragment, StatementKind, TranslateError, Translator,
        statement::{push, push_text},
    },
    types::BeanField,
};

const OFFSET: &str = "offset";
const LIMIT: &str = "limit";
const ITEM: &str = "item";

/// Renders derived methods as dynamic SQL against a single table.
pub struct SqlTranslator {
    table: String,
    naming: Box<dyn NamingConverter>,
}

impl SqlTranslator {
    pub fn new(table: impl Into<String>, naming: impl NamingConverter + 'static) -> Self {
        SqlTranslator {
            table: table.into(),
            naming: Box::new(naming),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn select(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<MappedStatement, TranslateError> {
        if method.ret.is_void() {
            return Err(TranslateError::InvalidReturn {
                method: method.name.clone(),
                expected: "a value".to_string(),
            });
        }

        let paging = match query.operation {
            OperationKind::Page => match (method.param(OFFSET), method.param(LIMIT)) {
                (Some(offset), Some(limit)) => Some((offset, limit)),
                _ => {
                    return Err(TranslateError::MissingPageParams {
                        method: method.name.clone(),
                    });
                }
            },
            _ => None,
        };

        let mut body = Vec::new();
        let head = match query.operation {
            OperationKind::Count => "SELECT COUNT(*)".to_string(),
            OperationKind::Exists => "SELECT COUNT(*) > 0".to_string(),
            _ => format!("SELECT {}", select_columns(&method.ret.bean_fields)),
        };
        push_text(&mut body, &format!("{} FROM {}", head, self.table));

        let fields = entity_fields(method);
        self.push_where(&mut body, query, method, fields)?;
        if let Some(order_by) = &query.order_by {
            push_text(&mut body, &self.order_by(order_by, fields));
        }

        match (query.operation, paging) {
            (OperationKind::Get, _) => push_text(&mut body, " LIMIT 1"),
            (_, Some((offset, limit))) => {
                push_text(&mut body, " LIMIT ");
                push(&mut body, SqlFragment::param(&limit.name));
                push_text(&mut body, " OFFSET ");
                push(&mut body, SqlFragment::param(&offset.name));
            }
            _ => {}
        }

        let mut statement = self.statement(method, StatementKind::Select, body);
        statement.result_type = Some(method.ret.ty.leaf().qualified_name().to_string());
        Ok(statement)
    }

    fn delete(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<MappedStatement, TranslateError> {
        let mut body = Vec::new();
        push_text(&mut body, &format!("DELETE FROM {}", self.table));
        self.push_where(&mut body, query, method, entity_fields(method))?;
        Ok(self.statement(method, StatementKind::Delete, body))
    }

    fn insert(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<MappedStatement, TranslateError> {
        let payload = method
            .params
            .iter()
            .find(|p| p.is_bean)
            .ok_or_else(|| TranslateError::MissingPayload {
                method: method.name.clone(),
            })?;
        if query.predicate.is_some() {
            return Err(unsupported(method, "insert statements take no condition"));
        }

        let batch = query.all || payload.is_iterable;
        if batch && !payload.is_iterable {
            return Err(unsupported(method, "`All` needs an iterable payload"));
        }
        if batch && query.selective {
            return Err(unsupported(method, "a batch insert cannot be selective"));
        }

        let mut body = Vec::new();
        push_text(&mut body, &format!("INSERT INTO {} ", self.table));

        if query.selective {
            let mut columns = Vec::new();
            let mut values = Vec::new();
            for field in &payload.bean_fields {
                let name = property_ref(method, payload, &field.name);
                let test = format!("{} != null", name);
                columns.push(SqlFragment::if_(
                    test.clone(),
                    vec![SqlFragment::text(format!("{},", field.column))],
                ));
                values.push(SqlFragment::if_(
                    test,
                    vec![SqlFragment::param(name), SqlFragment::text(",")],
                ));
            }
            push(&mut body, parenthesized(columns));
            push_text(&mut body, " VALUES ");
            push(&mut body, parenthesized(values));
        } else {
            let fields: Vec<&BeanField> = payload
                .bean_fields
                .iter()
                .filter(|f| !f.generated_key)
                .collect();
            if fields.is_empty() {
                return Err(unsupported(method, "the payload has no insertable fields"));
            }
            let columns: Vec<&str> = fields.iter().map(|f| f.column.as_str()).collect();
            push_text(&mut body, &format!("({}) VALUES ", columns.join(", ")));

            if batch {
                let names = fields.iter().map(|f| format!("{}.{}", ITEM, f.name));
                push(&mut body, SqlFragment::ForEach {
                    collection: payload.name.clone(),
                    item: ITEM.to_string(),
                    open: String::new(),
                    separator: ", ".to_string(),
                    close: String::new(),
                    body: value_list(names),
                });
            } else {
                let names = fields.iter().map(|f| property_ref(method, payload, &f.name));
                for fragment in value_list(names) {
                    push(&mut body, fragment);
                }
            }
        }

        let mut statement = self.statement(method, StatementKind::Insert, body);
        statement.key_property = payload
            .bean_fields
            .iter()
            .find(|f| f.generated_key)
            .map(|f| f.name.clone());
        Ok(statement)
    }

    fn update(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<MappedStatement, TranslateError> {
        let payload = method
            .params
            .iter()
            .find(|p| p.is_bean && !p.is_iterable)
            .ok_or_else(|| TranslateError::MissingPayload {
                method: method.name.clone(),
            })?;
        if query.all {
            return Err(unsupported(method, "batch updates are not supported"));
        }

        let referenced: Vec<&str> = query
            .predicate
            .iter()
            .flat_map(Predicate::conditions)
            .filter_map(|c| c.path.first())
            .collect();
        let fields: Vec<&BeanField> = payload
            .bean_fields
            .iter()
            .filter(|f| !referenced.contains(&f.name.as_str()))
            .collect();
        if fields.is_empty() {
            return Err(unsupported(method, "no field is left to assign"));
        }

        let mut body = Vec::new();
        push_text(&mut body, &format!("UPDATE {} ", self.table));

        if query.selective {
            let assignments = fields
                .iter()
                .map(|f| {
                    let name = property_ref(method, payload, &f.name);
                    SqlFragment::if_(
                        format!("{} != null", name),
                        vec![
                            SqlFragment::text(format!("{} = ", f.column)),
                            SqlFragment::param(name),
                            SqlFragment::text(","),
                        ],
                    )
                })
                .collect();
            push(&mut body, SqlFragment::Trim {
                prefix: "SET".to_string(),
                suffix: String::new(),
                prefix_overrides: Vec::new(),
                suffix_overrides: vec![",".to_string()],
                body: assignments,
            });
        } else {
            push_text(&mut body, "SET ");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    push_text(&mut body, ", ");
                }
                push_text(&mut body, &format!("{} = ", field.column));
                push(&mut body, SqlFragment::param(property_ref(method, payload, &field.name)));
            }
        }

        self.push_where(&mut body, query, method, &payload.bean_fields)?;
        Ok(self.statement(method, StatementKind::Update, body))
    }

    fn statement(
        &self,
        method: &MethodInfo,
        kind: StatementKind,
        body: Vec<SqlFragment>,
    ) -> MappedStatement {
        let mut statement = MappedStatement::new(&method.name, kind);
        if let [param] = method.params.as_slice() {
            statement.parameter_type = Some(param.ty.qualified_name().to_string());
        }
        statement.generated = true;
        statement.body = body;
        statement
    }

    /// Assigns each predicate condition the names of the values it compares
    /// against, in condition order.
    ///
    /// Scalar parameters are consumed positionally; with none available the
    /// properties of a bean parameter are used instead. Once a parameter has
    /// been dropped while binding, positions no longer line up with the
    /// declaration, so a method with operands fails outright.
    fn bind_operands(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<Vec<Vec<String>>, TranslateError> {
        let conditions = query
            .predicate
            .as_ref()
            .map(Predicate::conditions)
            .unwrap_or_default();
        let expected = query.operand_count();

        if expected == 0 {
            return Ok(vec![Vec::new(); conditions.len()]);
        }
        if let Some(param) = method.dropped.first() {
            return Err(TranslateError::DroppedParameter {
                method: method.name.clone(),
                param: param.clone(),
            });
        }

        let paged = query.operation == OperationKind::Page;
        let positional: Vec<&Param> = method
            .params
            .iter()
            .filter(|p| !p.is_bean && !(paged && (p.name == OFFSET || p.name == LIMIT)))
            .collect();
        let missing = |found: usize| TranslateError::MissingOperands {
            method: method.name.clone(),
            expected,
            found,
        };

        if positional.len() >= expected {
            if positional.len() > expected {
                log::debug!(
                    "{}: {} parameter(s) left unbound",
                    method.name,
                    positional.len() - expected
                );
            }
            let mut params = positional.into_iter();
            return conditions
                .iter()
                .map(|c| {
                    let bound: Vec<&Param> = params.by_ref().take(c.arity()).collect();
                    if c.comparator.expects_iterable()
                        && let Some(param) = bound.iter().find(|p| !p.is_iterable)
                    {
                        return Err(TranslateError::NotIterable {
                            method: method.name.clone(),
                            property: c.path.to_string(),
                            param: param.name.clone(),
                        });
                    }
                    Ok(bound.iter().map(|p| p.name.clone()).collect())
                })
                .collect();
        }

        let criteria = method.params.iter().find(|p| p.is_bean && !p.is_iterable);
        match criteria {
            Some(bean) if positional.is_empty() => conditions
                .iter()
                .map(|c| match c.arity() {
                    0 => Ok(Vec::new()),
                    1 => Ok(vec![property_ref(method, bean, &c.path.join("."))]),
                    _ => Err(missing(0)),
                })
                .collect(),
            _ => Err(missing(positional.len())),
        }
    }

    fn push_where(
        &self,
        body: &mut Vec<SqlFragment>,
        query: &Query,
        method: &MethodInfo,
        fields: &[BeanField],
    ) -> Result<(), TranslateError> {
        let operands = self.bind_operands(query, method)?;
        let Some(predicate) = &query.predicate else {
            return Ok(());
        };

        let mut operands = operands.into_iter();
        let groups = predicate.groups();
        if predicate.has_selective() {
            let mut inner = Vec::new();
            self.dynamic_group(&groups, &mut operands, fields, None, true, &mut inner);
            push_text(body, " ");
            push(body, SqlFragment::Trim {
                prefix: "WHERE".to_string(),
                suffix: String::new(),
                prefix_overrides: vec!["AND ".to_string(), "OR ".to_string()],
                suffix_overrides: Vec::new(),
                body: inner,
            });
        } else {
            push_text(body, " WHERE ");
            self.static_group(&groups, &mut operands, fields, false, body);
        }
        Ok(())
    }

    fn static_group(
        &self,
        group: &PredicateGroup<'_>,
        operands: &mut impl Iterator<Item = Vec<String>>,
        fields: &[BeanField],
        nested: bool,
        out: &mut Vec<SqlFragment>,
    ) {
        match group {
            PredicateGroup::Leaf { condition, .. } => {
                let names = operands.next().unwrap_or_default();
                for fragment in self.condition(condition, &names, fields) {
                    push(out, fragment);
                }
            }
            PredicateGroup::Group { op, children, .. } => {
                if nested {
                    push_text(out, "(");
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        push_text(out, &format!(" {} ", op.keyword()));
                    }
                    self.static_group(child, operands, fields, true, out);
                }
                if nested {
                    push_text(out, ")");
                }
            }
        }
    }

    /// Renders a group whose parts may drop out at runtime. Every part carries
    /// its own leading connective; an enclosing trim strips the one left in
    /// front. Returns the operand names the group binds.
    fn dynamic_group(
        &self,
        group: &PredicateGroup<'_>,
        operands: &mut impl Iterator<Item = Vec<String>>,
        fields: &[BeanField],
        connective: Option<LogicOp>,
        top: bool,
        out: &mut Vec<SqlFragment>,
    ) -> Vec<String> {
        let lead = connective.map(|op| format!("{} ", op.keyword())).unwrap_or_default();
        let (selective, names, body) = match group {
            PredicateGroup::Leaf {
                condition,
                selective,
            } => {
                let names = operands.next().unwrap_or_default();
                let mut body = Vec::new();
                if !lead.is_empty() {
                    push_text(&mut body, &format!(" {}", lead));
                }
                for fragment in self.condition(condition, &names, fields) {
                    push(&mut body, fragment);
                }
                (*selective, names, body)
            }
            PredicateGroup::Group {
                op,
                selective,
                children,
            } => {
                let mut names = Vec::new();
                let mut inner = Vec::new();
                for (i, child) in children.iter().enumerate() {
                    let connective = (i > 0).then_some(*op);
                    names.extend(self.dynamic_group(
                        child,
                        operands,
                        fields,
                        connective,
                        false,
                        &mut inner,
                    ));
                }
                let body = if top {
                    inner
                } else {
                    vec![SqlFragment::Trim {
                        prefix: format!("{}(", lead),
                        suffix: ")".to_string(),
                        prefix_overrides: vec!["AND ".to_string(), "OR ".to_string()],
                        suffix_overrides: Vec::new(),
                        body: inner,
                    }]
                };
                (*selective, names, body)
            }
        };

        if selective && !names.is_empty() {
            push(out, SqlFragment::if_(presence_test(&names), body));
        } else {
            for fragment in body {
                push(out, fragment);
            }
        }
        names
    }

    fn condition(
        &self,
        condition: &Condition,
        names: &[String],
        fields: &[BeanField],
    ) -> Vec<SqlFragment> {
        let column = self.column(&condition.path, fields);
        let operand = |i: usize| SqlFragment::param(names.get(i).cloned().unwrap_or_default());
        let binary = |op: &str| vec![SqlFragment::text(format!("{} {} ", column, op)), operand(0)];

        match condition.comparator {
            Comparator::Equal => binary("="),
            Comparator::Not => binary("!="),
            Comparator::GreaterThan => binary(">"),
            Comparator::GreaterThanEqual => binary(">="),
            Comparator::LessThan => binary("<"),
            Comparator::LessThanEqual => binary("<="),
            Comparator::Like => binary("LIKE"),
            Comparator::NotLike => binary("NOT LIKE"),
            Comparator::Containing => vec![
                SqlFragment::text(format!("{} LIKE CONCAT('%', ", column)),
                operand(0),
                SqlFragment::text(", '%')"),
            ],
            Comparator::StartingWith => vec![
                SqlFragment::text(format!("{} LIKE CONCAT(", column)),
                operand(0),
                SqlFragment::text(", '%')"),
            ],
            Comparator::EndingWith => vec![
                SqlFragment::text(format!("{} LIKE CONCAT('%', ", column)),
                operand(0),
                SqlFragment::text(")"),
            ],
            Comparator::In | Comparator::NotIn => {
                let op = if condition.comparator == Comparator::In { "IN" } else { "NOT IN" };
                vec![
                    SqlFragment::text(format!("{} {} ", column, op)),
                    SqlFragment::ForEach {
                        collection: names.first().cloned().unwrap_or_default(),
                        item: ITEM.to_string(),
                        open: "(".to_string(),
                        separator: ", ".to_string(),
                        close: ")".to_string(),
                        body: vec![SqlFragment::param(ITEM)],
                    },
                ]
            }
            Comparator::IsNull => vec![SqlFragment::text(format!("{} IS NULL", column))],
            Comparator::IsNotNull => vec![SqlFragment::text(format!("{} IS NOT NULL", column))],
            Comparator::Between => vec![
                SqlFragment::text(format!("{} BETWEEN ", column)),
                operand(0),
                SqlFragment::text(" AND "),
                operand(1),
            ],
        }
    }

    fn order_by(&self, order_by: &OrderBy, fields: &[BeanField]) -> String {
        let keys: Vec<String> = order_by
            .clauses()
            .iter()
            .map(|clause| {
                format!(
                    "{} {}",
                    self.column(&clause.path, fields),
                    clause.direction.keyword()
                )
            })
            .collect();
        format!(" ORDER BY {}", keys.join(", "))
    }

    /// Column of a property: the mapped column of a matching bean field, or
    /// the converted segments joined by `_`.
    fn column(&self, path: &PropertyPath, fields: &[BeanField]) -> String {
        if !path.is_nested()
            && let Some(field) = fields.iter().find(|f| Some(f.name.as_str()) == path.first())
        {
            return field.column.clone();
        }
        path.segments()
            .iter()
            .map(|segment| self.naming.convert(segment))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl Translator for SqlTranslator {
    fn translate(
        &self,
        query: &Query,
        method: &MethodInfo,
    ) -> Result<MappedStatement, TranslateError> {
        match query.operation {
            OperationKind::Find
            | OperationKind::Get
            | OperationKind::Count
            | OperationKind::Exists
            | OperationKind::Page => self.select(query, method),
            OperationKind::Delete => self.delete(query, method),
            OperationKind::Insert => self.insert(query, method),
            OperationKind::Update => self.update(query, method),
        }
    }
}

/// Fields of the bean the statement is about: a bean parameter, else the return bean.
fn entity_fields(method: &MethodInfo) -> &[BeanField] {
    method
        .params
        .iter()
        .find(|p| p.is_bean)
        .map(|p| p.bean_fields.as_slice())
        .unwrap_or(method.ret.bean_fields.as_slice())
}

fn select_columns(fields: &[BeanField]) -> String {
    if fields.is_empty() {
        return "*".to_string();
    }
    fields
        .iter()
        .map(|f| {
            if f.column == f.name {
                f.column.clone()
            } else {
                format!("{} AS {}", f.column, f.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Name a bean property is bound under: bare for a sole parameter, qualified
/// by the parameter name otherwise.
fn property_ref(method: &MethodInfo, bean: &Param, property: &str) -> String {
    if method.params.len() == 1 {
        property.to_string()
    } else {
        format!("{}.{}", bean.name, property)
    }
}

fn presence_test(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("{} != null", n))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn value_list(names: impl Iterator<Item = String>) -> Vec<SqlFragment> {
    let mut body = Vec::new();
    push_text(&mut body, "(");
    for (i, name) in names.enumerate() {
        if i > 0 {
            push_text(&mut body, ", ");
        }
        push(&mut body, SqlFragment::param(name));
    }
    push_text(&mut body, ")");
    body
}

fn parenthesized(body: Vec<SqlFragment>) -> SqlFragment {
    SqlFragment::Trim {
        prefix: "(".to_string(),
        suffix: ")".to_string(),
        prefix_overrides: Vec::new(),
        suffix_overrides: vec![",".to_string()],
        body,
    }
}

fn unsupported(method: &MethodInfo, reason: &str) -> TranslateError {
    TranslateError::Unsupported {
        method: method.name.clone(),
        reason: reason.to_string(),
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Primitive value types of the model language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Primitive> {
        let primitive = match keyword {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        };
        Some(primitive)
    }

    /// Fully qualified name of the wrapper class
    pub fn boxed_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
            Primitive::Void => "java.lang.Void",
        }
    }

    /// Literal used when a primitive accessor reads an unset value
    pub fn default_literal(self) -> &'static str {
        match self {
            Primitive::Boolean => "false",
            Primitive::Char => "'\\0'",
            Primitive::Long => "0L",
            Primitive::Float => "0.0f",
            Primitive::Double => "0.0d",
            Primitive::Byte | Primitive::Short | Primitive::Int => "0",
            Primitive::Void => "null",
        }
    }
}

///
/// A reference to a type as it appears in a signature: a primitive, a
/// (possibly parameterized) class, a type variable, an array or a wildcard.
///
/// Class names are always fully qualified with `.` separating packages and
/// enclosing types, e.g. `pkg.MyFormData.Name`.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(Primitive),
    Class {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeRef>,
    },
    Variable(String),
    Array(Box<TypeRef>),
    /// `?` or `? extends <bound>`
    Wildcard(Option<Box<TypeRef>>),
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Class {
            name: name.into(),
            args,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable(name.into())
    }

    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    pub fn wildcard_extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard(Some(Box::new(bound)))
    }

    /// The erased class name, if this is a class reference
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Class { args, .. } => args,
            _ => &[],
        }
    }

    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Class { name, .. } => simple_name_of(name).to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(p) if *p != Primitive::Void)
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Replaces primitives by their wrapper classes; everything else is returned as is
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::class(p.boxed_name()),
            other => other.clone(),
        }
    }

    pub fn with_args(&self, args: Vec<TypeRef>) -> TypeRef {
        match self {
            TypeRef::Class { name, .. } => TypeRef::generic(name.clone(), args),
            other => other.clone(),
        }
    }

    /// Substitutes type variables. Variables without a binding are kept.
    pub fn substitute(&self, bindings: &BTreeMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Variable(v) => bindings.get(v).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Class { name, args } => TypeRef::Class {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Array(component) => TypeRef::Array(Box::new(component.substitute(bindings))),
            TypeRef::Wildcard(Some(bound)) => {
                TypeRef::Wildcard(Some(Box::new(bound.substitute(bindings))))
            }
            TypeRef::Primitive(_) | TypeRef::Wildcard(None) => self.clone(),
        }
    }

    /// Type variables still present in this reference, in first-occurrence order
    pub fn free_variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            TypeRef::Variable(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            TypeRef::Class { args, .. } => args.iter().for_each(|a| a.collect_variables(out)),
            TypeRef::Array(component) => component.collect_variables(out),
            TypeRef::Wildcard(Some(bound)) => bound.collect_variables(out),
            TypeRef::Primitive(_) | TypeRef::Wildcard(None) => {}
        }
    }

    /// Parses a signature such as `java.util.Set<java.lang.Long>`, `int[]` or `T`.
    /// Unqualified names that are not primitive keywords are type variables.
    pub fn parse(input: &str) -> Result<TypeRef, TypeParseError> {
        let mut parser = SignatureParser {
            input,
            chars: input.char_indices().peekable(),
        };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if let Some((pos, _)) = parser.chars.peek() {
            return Err(TypeParseError::new(input, format!("trailing input at {pos}")));
        }
        Ok(parsed)
    }
}

/// Last segment of a dotted name
pub fn simple_name_of(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => f.write_str(p.keyword()),
            TypeRef::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Variable(v) => f.write_str(v),
            TypeRef::Array(component) => write!(f, "{component}[]"),
            TypeRef::Wildcard(None) => f.write_str("?"),
            TypeRef::Wildcard(Some(bound)) => write!(f, "? extends {bound}"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type signature `{input}`: {message}")]
pub struct TypeParseError {
    pub input: String,
    pub message: String,
}

impl TypeParseError {
    fn new(input: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

struct SignatureParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl SignatureParser<'_> {
    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Result<String, TypeParseError> {
        self.skip_whitespace();
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || *c == '_' || *c == '$' || *c == '.' {
                ident.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }
        if ident.is_empty() || ident.starts_with('.') || ident.ends_with('.') {
            return Err(TypeParseError::new(self.input, "expected a type name"));
        }
        Ok(ident)
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        let mut parsed = if self.eat('?') {
            self.skip_whitespace();
            let rest: String = self.chars.clone().take(7).map(|(_, c)| c).collect();
            if rest == "extends" {
                for _ in 0..7 {
                    self.chars.next();
                }
                TypeRef::wildcard_extends(self.parse_type()?)
            } else {
                TypeRef::Wildcard(None)
            }
        } else {
            let ident = self.identifier()?;
            if let Some(primitive) = Primitive::from_keyword(&ident) {
                TypeRef::Primitive(primitive)
            } else if ident.contains('.') {
                let mut args = Vec::new();
                if self.eat('<') {
                    loop {
                        args.push(self.parse_type()?);
                        if self.eat(',') {
                            continue;
                        }
                        if self.eat('>') {
                            break;
                        }
                        return Err(TypeParseError::new(self.input, "expected `,` or `>`"));
                    }
                }
                TypeRef::generic(ident, args)
            } else {
                TypeRef::Variable(ident)
            }
        };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(TypeParseError::new(self.input, "expected `]`"));
            }
            parsed = TypeRef::array_of(parsed);
        }
        Ok(parsed)
    }
}

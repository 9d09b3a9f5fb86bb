//! Runtime context consulted by render units

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::config::ConfigError;

/// A value provided to templates
pub type Value = toml::Value;

/// A data model mapping names to values
pub type Table = toml::Table;

/// A named function callable from slot text
pub type Handler = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// Source of names for render units
#[derive(Clone)]
pub enum Provider {
    /// Values looked up by name
    Model(Table),
    /// Handler functions looked up by name
    Handlers(HashMap<String, Handler>),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Model(table) => f.debug_tuple("Model").field(table).finish(),
            Provider::Handlers(handlers) => {
                let mut names: Vec<_> = handlers.keys().collect();
                names.sort();
                f.debug_tuple("Handlers").field(&names).finish()
            }
        }
    }
}

impl Provider {
    fn value(&self, name: &str) -> Option<&Value> {
        match self {
            Provider::Model(table) => table.get(name),
            Provider::Handlers(_) => None,
        }
    }

    fn handler(&self, name: &str) -> Option<&Handler> {
        match self {
            Provider::Model(_) => None,
            Provider::Handlers(handlers) => handlers.get(name),
        }
    }
}

/// Ordered providers searched first to last
///
/// Providers added by the caller always take precedence over the built-in
/// handlers, which are searched after them.
#[derive(Debug, Clone, Default)]
pub struct Context {
    providers: Vec<Provider>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Append a data model
    pub fn with_model(self, model: Table) -> Self {
        self.with_provider(Provider::Model(model))
    }

    /// Append a data model parsed from TOML text
    pub fn with_model_str(self, content: &str) -> Result<Self, ConfigError> {
        let model: Table = toml::from_str(content)?;
        Ok(self.with_model(model))
    }

    /// Set a single value in the most recently added data model
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        match self.providers.last_mut() {
            Some(Provider::Model(table)) => {
                table.insert(name.into(), value.into());
            }
            _ => {
                let mut table = Table::new();
                table.insert(name.into(), value.into());
                self.providers.push(Provider::Model(table));
            }
        }
        self
    }

    /// Register a handler in the most recently added handler mapping
    pub fn with_handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        match self.providers.last_mut() {
            Some(Provider::Handlers(handlers)) => {
                handlers.insert(name.into(), handler);
            }
            _ => {
                let mut handlers = HashMap::new();
                handlers.insert(name.into(), handler);
                self.providers.push(Provider::Handlers(handlers));
            }
        }
        self
    }

    /// All providers in lookup order, built-ins last
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        let defaults: &Provider = builtins();
        self.providers.iter().chain(std::iter::once(defaults))
    }

    /// Look up a value by name
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.providers().find_map(|p| p.value(name))
    }

    /// Look up a handler by name
    pub fn handler(&self, name: &str) -> Option<&Handler> {
        self.providers().find_map(|p| p.handler(name))
    }
}

/// Text emitted for a value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(d) => d.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Table(_) => value.to_string(),
    }
}

fn builtins() -> &'static Provider {
    static BUILTINS: OnceLock<Provider> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        let mut handlers: HashMap<String, Handler> = HashMap::new();
        handlers.insert("upper".into(), Arc::new(upper));
        handlers.insert("lower".into(), Arc::new(lower));
        handlers.insert("trim".into(), Arc::new(trim));
        handlers.insert("len".into(), Arc::new(len));
        handlers.insert("join".into(), Arc::new(join));
        Provider::Handlers(handlers)
    })
}

fn map_text(args: &[Value], f: impl Fn(&str) -> String) -> Result<Value, String> {
    match args {
        [value] => Ok(Value::String(f(&display_value(value)))),
        _ => Err(format!("expected 1 argument, got {}", args.len())),
    }
}

fn upper(args: &[Value]) -> Result<Value, String> {
    map_text(args, str::to_uppercase)
}

fn lower(args: &[Value]) -> Result<Value, String> {
    map_text(args, str::to_lowercase)
}

fn trim(args: &[Value]) -> Result<Value, String> {
    map_text(args, |s| s.trim().to_string())
}

fn len(args: &[Value]) -> Result<Value, String> {
    let n = match args {
        [Value::String(s)] => s.chars().count(),
        [Value::Array(items)] => items.len(),
        [Value::Table(table)] => table.len(),
        [other] => return Err(format!("cannot take the length of a {}", other.type_str())),
        _ => return Err(format!("expected 1 argument, got {}", args.len())),
    };
    Ok(Value::Integer(n as i64))
}

fn join(args: &[Value]) -> Result<Value, String> {
    let (items, sep) = match args {
        [Value::Array(items)] => (items, ", ".to_string()),
        [Value::Array(items), sep] => (items, display_value(sep)),
        [other, ..] if !other.is_array() => {
            return Err(format!("expected an array, got a {}", other.type_str()))
        }
        _ => return Err(format!("expected 1 or 2 arguments, got {}", args.len())),
    };
    let joined = items
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(sep.as_str());
    Ok(Value::String(joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_provider_wins() {
        let ctx = Context::new()
            .with_value("name", "first")
            .with_handler("noop", |_| Ok(Value::Boolean(true)))
            .with_value("name", "second");
        assert_eq!(ctx.lookup("name"), Some(&Value::String("first".into())));
    }

    #[test]
    fn test_with_value_extends_last_model() {
        let ctx = Context::new().with_value("a", 1).with_value("b", 2);
        assert_eq!(ctx.providers().count(), 2);
        assert_eq!(ctx.lookup("b"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_caller_handler_shadows_builtin() {
        let ctx = Context::new().with_handler("upper", |_| Ok(Value::String("mine".into())));
        let upper = ctx.handler("upper").unwrap();
        assert_eq!(upper(&[]).unwrap(), Value::String("mine".into()));
    }

    #[test]
    fn test_builtins_are_always_available() {
        let ctx = Context::new();
        let upper = ctx.handler("upper").unwrap();
        assert_eq!(upper(&[Value::String("abc".into())]).unwrap(), Value::String("ABC".into()));
        assert!(ctx.handler("missing").is_none());
        assert!(matches!(ctx.providers().last(), Some(Provider::Handlers(_))));
    }

    #[test]
    fn test_model_from_toml() {
        let ctx = Context::new()
            .with_model_str("title = \"Report\"\n[user]\nname = \"ada\"")
            .unwrap();
        assert_eq!(ctx.lookup("title"), Some(&Value::String("Report".into())));
        assert!(ctx.lookup("user").is_some_and(|v| v.is_table()));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::Integer(45)), "45");
        assert_eq!(display_value(&Value::String("x y".into())), "x y");
        assert_eq!(display_value(&Value::Boolean(false)), "false");
        let list = Value::Array(vec![1.into(), "two".into()]);
        assert_eq!(display_value(&list), "1, two");
    }

    #[test]
    fn test_len_and_join() {
        assert_eq!(len(&[Value::String("héllo".into())]).unwrap(), Value::Integer(5));
        let list = Value::Array(vec!["a".into(), "b".into()]);
        assert_eq!(join(&[list.clone()]).unwrap(), Value::String("a, b".into()));
        assert_eq!(join(&[list, Value::String("-".into())]).unwrap(), Value::String("a-b".into()));
        assert!(join(&[Value::Integer(1)]).is_err());
        assert!(len(&[Value::Integer(1)]).is_err());
    }

    #[test]
    fn test_text_handlers_check_arity() {
        assert!(map_text(&[], str::to_uppercase).is_err());
    }
}

//! Parser options.
//!
//! Options are the key/value configuration a parser exposes to its caller.
//! A parser lists the options it understands and silently ignores the rest.
use std::fmt;
use thiserror::Error;

/// A list specifying option parsing and validating errors.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Error)]
pub enum OptionError {
    /// Option name does not match the definition.
    #[error("wrong option name")]
    WrongName,
}

/// A specialised `Result` type for option parsing/validation.
pub type OptionResult<T> = Result<T, OptionError>;

/// Option definition type.
#[derive(Debug)]
pub enum NAOptionDefinitionType {
    /// Flag.
    Bool,
}

/// Option definition.
#[derive(Debug)]
pub struct NAOptionDefinition {
    pub name:           &'static str,
    pub description:    &'static str,
    pub opt_type:       NAOptionDefinitionType,
}

impl NAOptionDefinition {
    /// Converts command-line style input into an option.
    ///
    /// Flags are set by their name (`split_superframes`) and cleared with a `no` prefix (`nosplit_superframes`).
    /// Leading `--` is accepted.
    pub fn parse(&self, name: &str) -> OptionResult<NAOption> {
        let name = name.trim_start_matches("--");
        let (name, negated) = match name.strip_prefix("no") {
                Some(base) if base == self.name => (base, true),
                _ => (name, false),
            };
        if name != self.name {
            return Err(OptionError::WrongName);
        }
        let value = match self.opt_type {
                NAOptionDefinitionType::Bool => NAValue::Bool(!negated),
            };
        let opt = NAOption { name: self.name, value };
        self.check(&opt)?;
        Ok(opt)
    }
    /// Checks that the option belongs to this definition and has an acceptable value.
    pub fn check(&self, option: &NAOption) -> OptionResult<()> {
        if option.name != self.name {
            return Err(OptionError::WrongName);
        }
        match (&self.opt_type, &option.value) {
            (NAOptionDefinitionType::Bool, NAValue::Bool(_)) => Ok(()),
        }
    }
}

impl fmt::Display for NAOptionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.opt_type {
            NAOptionDefinitionType::Bool => write!(f, "[no]{}: {}", self.name, self.description),
        }
    }
}

/// Option name with a value.
#[derive(Clone,Debug,PartialEq)]
pub struct NAOption {
    pub name:   &'static str,
    pub value:  NAValue,
}

/// Option value.
#[derive(Debug,Clone,PartialEq)]
pub enum NAValue {
    Bool(bool),
}

/// Trait for objects configurable with `NAOption`.
pub trait NAOptionHandler {
    /// Returns the options recognised by current object.
    fn get_supported_options(&self) -> &[NAOptionDefinition];
    /// Applies recognised options and ignores the rest.
    fn set_options(&mut self, options: &[NAOption]);
    /// Queries the current option value in the object (if present).
    fn query_option_value(&self, name: &str) -> Option<NAValue>;
}

#[cfg(test)]
mod test {
    use super::*;

    const FLAG: NAOptionDefinition = NAOptionDefinition { name: "split_superframes", description: "split", opt_type: NAOptionDefinitionType::Bool };

    #[test]
    fn test_option_validation() {
        let opt = NAOption { name: "split_superframes", value: NAValue::Bool(false) };
        assert!(FLAG.check(&opt).is_ok());
        assert_eq!(FLAG.check(&NAOption { name: "split", ..opt }), Err(OptionError::WrongName));
    }
    #[test]
    fn test_option_parsing() {
        assert_eq!(FLAG.parse("--split_superframes"), Ok(NAOption { name: "split_superframes", value: NAValue::Bool(true) }));
        assert_eq!(FLAG.parse("nosplit_superframes"), Ok(NAOption { name: "split_superframes", value: NAValue::Bool(false) }));
        assert_eq!(FLAG.parse("split"), Err(OptionError::WrongName));
        assert_eq!(FLAG.parse("nosplit"), Err(OptionError::WrongName));
        assert_eq!(FLAG.to_string(), "[no]split_superframes: split");
    }
}

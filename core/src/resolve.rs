//! Flag resolution.
//!
//! Maps a classified flag or alias token to the schema it names. A
//! command's own flags are searched before its global flags, so an own flag
//! shadows a global flag of the same name.

use crate::flags::FlagTable;
use crate::schema::Schema;
use crate::token::{Token, TokenKind};

/// A token matched to its flag definition.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFlag<'a> {
    pub name: &'a str,
    pub schema: &'a Schema,
}

/// Looks flags up in a command's own and global tables.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    flags: &'a FlagTable,
    global_flags: &'a FlagTable,
}

impl<'a> Resolver<'a> {
    pub fn new(flags: &'a FlagTable, global_flags: &'a FlagTable) -> Self {
        Self {
            flags,
            global_flags,
        }
    }

    /// Every visible flag: own flags first, then global flags that are not
    /// shadowed.
    pub fn combined(&self) -> impl Iterator<Item = ResolvedFlag<'a>> + 'a {
        let (flags, global_flags) = (self.flags, self.global_flags);
        flags
            .iter()
            .chain(
                global_flags
                    .iter()
                    .filter(move |(name, _)| flags.get(name).is_none()),
            )
            .map(|(name, schema)| ResolvedFlag { name, schema })
    }

    /// Resolves a flag or alias token; `None` when nothing matches or the
    /// token is a value.
    pub fn resolve(&self, token: &Token) -> Option<ResolvedFlag<'a>> {
        let key = token.key.as_deref()?;
        let (flags, global_flags) = (self.flags, self.global_flags);
        match token.kind {
            TokenKind::Flag => flags
                .iter()
                .chain(global_flags.iter())
                .find(|(name, _)| *name == key)
                .map(|(name, schema)| ResolvedFlag { name, schema }),
            TokenKind::Alias => self
                .combined()
                .find(|flag| flag.schema.meta().aliases.iter().any(|alias| alias == key)),
            TokenKind::Value => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::System;
    use crate::schema;
    use crate::token::classify;

    fn tables() -> (FlagTable, FlagTable) {
        let mut flags = FlagTable::new();
        flags.insert("root", schema::string().aliases(["r"]));
        flags.insert("verbose", schema::boolean().aliases(["v"]));

        let mut global = FlagTable::new();
        global.insert("root", schema::number().aliases(["R"]));
        global.insert("quiet", schema::boolean().aliases(["q"]));
        (flags, global)
    }

    fn resolve<'a>(resolver: &Resolver<'a>, raw: &str) -> Option<ResolvedFlag<'a>> {
        resolver.resolve(&classify(raw, &System::default()).unwrap())
    }

    #[test]
    fn test_own_flag_shadows_global() {
        let (flags, global) = tables();
        let resolver = Resolver::new(&flags, &global);

        let found = resolve(&resolver, "--root").unwrap();
        assert_eq!(found.name, "root");
        assert_eq!(found.schema.type_name(), "string");
    }

    #[test]
    fn test_global_flag_and_alias() {
        let (flags, global) = tables();
        let resolver = Resolver::new(&flags, &global);

        assert_eq!(resolve(&resolver, "--quiet").unwrap().name, "quiet");
        assert_eq!(resolve(&resolver, "-q").unwrap().name, "quiet");
        assert_eq!(resolve(&resolver, "-v").unwrap().name, "verbose");
    }

    #[test]
    fn test_shadowed_global_alias_is_not_visible() {
        let (flags, global) = tables();
        let resolver = Resolver::new(&flags, &global);

        assert!(resolve(&resolver, "-R").is_none());
    }

    #[test]
    fn test_unknown_and_values() {
        let (flags, global) = tables();
        let resolver = Resolver::new(&flags, &global);

        assert!(resolve(&resolver, "--nope").is_none());
        assert!(resolve(&resolver, "root").is_none());
        assert!(resolve(&resolver, "-root").is_none());
    }

    #[test]
    fn test_combined_order() {
        let (flags, global) = tables();
        let resolver = Resolver::new(&flags, &global);

        let names: Vec<&str> = resolver.combined().map(|f| f.name).collect();
        assert_eq!(names, ["root", "verbose", "quiet"]);
    }
}

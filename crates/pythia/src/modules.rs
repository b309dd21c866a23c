//! Built-in module registry.
//!
//! Stands in for an import system: completion resolves imported names
//! against this table instead of the filesystem, so an in-memory document
//! can complete `example_module.` without any file on disk.

#[derive(Debug, Clone, Copy)]
pub struct Member {
    pub name: &'static str,
    pub category: &'static str,
    pub docstring: &'static str,
    /// Attributes reachable through this member (methods for a class).
    pub members: &'static [Member],
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleEntry {
    pub name: &'static str,
    pub docstring: &'static str,
    pub members: &'static [Member],
}

pub struct ModuleRegistry {
    entries: &'static [ModuleEntry],
}

impl ModuleRegistry {
    pub fn builtin() -> Self {
        Self { entries: BUILTIN_MODULES }
    }

    pub fn module(&self, name: &str) -> Option<&'static ModuleEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Walk `segments` down from a module entry through class members.
    /// Returns the member table at the end of the path, or None when any
    /// segment does not resolve.
    pub fn resolve_members(&self, module: &str, segments: &[String]) -> Option<&'static [Member]> {
        let mut members = self.module(module)?.members;
        for segment in segments {
            let member = members
                .iter()
                .find(|member| member.name == segment.as_str())?;
            members = member.members;
        }
        Some(members)
    }
}

const CALCULATOR_METHODS: &[Member] = &[
    Member {
        name: "add",
        category: "method",
        docstring: "Add a number to the current value.",
        members: &[],
    },
    Member {
        name: "subtract",
        category: "method",
        docstring: "Subtract a number from the current value.",
        members: &[],
    },
    Member {
        name: "reset",
        category: "method",
        docstring: "Reset the calculator to zero.",
        members: &[],
    },
    Member {
        name: "get_value",
        category: "method",
        docstring: "Return the current value.",
        members: &[],
    },
];

const EXAMPLE_MODULE_MEMBERS: &[Member] = &[
    Member {
        name: "add",
        category: "function",
        docstring: "Add two numbers and return the result.",
        members: &[],
    },
    Member {
        name: "subtract",
        category: "function",
        docstring: "Subtract b from a and return the result.",
        members: &[],
    },
    Member {
        name: "multiply",
        category: "function",
        docstring: "Multiply two numbers and return the result.",
        members: &[],
    },
    Member {
        name: "divide",
        category: "function",
        docstring: "Divide a by b and return the result.",
        members: &[],
    },
    Member {
        name: "Calculator",
        category: "class",
        docstring: "A simple calculator class.",
        members: CALCULATOR_METHODS,
    },
];

const MATH_MEMBERS: &[Member] = &[
    Member {
        name: "ceil",
        category: "function",
        docstring: "Return the ceiling of x as an Integral.",
        members: &[],
    },
    Member {
        name: "floor",
        category: "function",
        docstring: "Return the floor of x as an Integral.",
        members: &[],
    },
    Member {
        name: "sqrt",
        category: "function",
        docstring: "Return the square root of x.",
        members: &[],
    },
    Member {
        name: "pi",
        category: "instance",
        docstring: "The mathematical constant pi.",
        members: &[],
    },
    Member {
        name: "e",
        category: "instance",
        docstring: "The mathematical constant e.",
        members: &[],
    },
];

const BUILTIN_MODULES: &[ModuleEntry] = &[
    ModuleEntry {
        name: "example_module",
        docstring: "Example module to demonstrate local module imports",
        members: EXAMPLE_MODULE_MEMBERS,
    },
    ModuleEntry {
        name: "math",
        docstring: "Mathematical functions and constants.",
        members: MATH_MEMBERS,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_module() {
        let registry = ModuleRegistry::builtin();
        let module = registry.module("example_module").expect("module exists");
        let names: Vec<&str> = module.members.iter().map(|member| member.name).collect();
        assert_eq!(names, ["add", "subtract", "multiply", "divide", "Calculator"]);
    }

    #[test]
    fn resolves_class_members_through_path() {
        let registry = ModuleRegistry::builtin();
        let members = registry
            .resolve_members("example_module", &["Calculator".to_string()])
            .expect("class resolves");
        assert!(members.iter().any(|member| member.name == "reset"));
        assert!(members.iter().all(|member| member.category == "method"));
    }

    #[test]
    fn unknown_paths_resolve_to_none() {
        let registry = ModuleRegistry::builtin();
        assert!(registry.module("os").is_none());
        assert!(registry
            .resolve_members("example_module", &["missing".to_string()])
            .is_none());
    }
}

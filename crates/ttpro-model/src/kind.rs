//! Entity kinds and their RPC method names
//!
//! The server derives method names from the entity table: editing table
//! `Defect` goes through `editDefect`, a save through `saveDefect`, and an
//! abandoned edit through `cancelSaveDefect`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Defect,
    Requirement,
    TestCase,
}

impl EntityKind {
    /// Server-side table name
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Defect => "Defect",
            EntityKind::Requirement => "Requirement",
            EntityKind::TestCase => "TestCase",
        }
    }

    /// RPC that acquires the edit lock and returns the payload
    pub fn edit_method(&self) -> &'static str {
        match self {
            EntityKind::Defect => "editDefect",
            EntityKind::Requirement => "editRequirement",
            EntityKind::TestCase => "editTestCase",
        }
    }

    /// RPC that stores the payload and releases the edit lock
    pub fn save_method(&self) -> &'static str {
        match self {
            EntityKind::Defect => "saveDefect",
            EntityKind::Requirement => "saveRequirement",
            EntityKind::TestCase => "saveTestCase",
        }
    }

    /// RPC that releases the edit lock without storing anything
    pub fn cancel_save_method(&self) -> &'static str {
        match self {
            EntityKind::Defect => "cancelSaveDefect",
            EntityKind::Requirement => "cancelSaveRequirement",
            EntityKind::TestCase => "cancelSaveTestCase",
        }
    }

    /// Read-only fetch, no lock taken
    pub fn get_method(&self) -> &'static str {
        match self {
            EntityKind::Defect => "getDefect",
            EntityKind::Requirement => "getRequirement",
            EntityKind::TestCase => "getTestCase",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "defect" => Ok(EntityKind::Defect),
            "requirement" => Ok(EntityKind::Requirement),
            "testcase" | "test_case" => Ok(EntityKind::TestCase),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

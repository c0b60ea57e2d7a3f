/// A leaf topic inside a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleNode {
    pub name: String,

    /// Text the description is generated from
    pub raw_content: String,

    /// Generated description, empty until summarized
    pub description: String,
}

impl SubmoduleNode {
    pub fn new(name: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_content: raw_content.into(),
            description: String::new(),
        }
    }
}

/// A top-level documentation topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    pub name: String,

    /// Page the module was first found on
    pub source_url: String,

    /// Text the description is generated from
    pub raw_content: String,

    /// Generated description, empty until summarized
    pub description: String,

    /// Submodules in first-seen order, unique by name
    pub submodules: Vec<SubmoduleNode>,
}

impl ModuleNode {
    pub fn new(
        name: impl Into<String>,
        source_url: impl Into<String>,
        raw_content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            raw_content: raw_content.into(),
            description: String::new(),
            submodules: Vec::new(),
        }
    }

    /// Adds a submodule unless one with the same name exists
    ///
    /// Returns true if the submodule was added.
    pub fn add_submodule(&mut self, submodule: SubmoduleNode) -> bool {
        if self.submodule(&submodule.name).is_some() {
            return false;
        }
        self.submodules.push(submodule);
        true
    }

    pub fn submodule(&self, name: &str) -> Option<&SubmoduleNode> {
        self.submodules.iter().find(|s| s.name == name)
    }
}

/// Modules keyed by name, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMap {
    modules: Vec<ModuleNode>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleNode> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Returns the module called `name`, creating it with `create` if missing
    pub fn get_or_insert_with<F>(&mut self, name: &str, create: F) -> &mut ModuleNode
    where
        F: FnOnce() -> ModuleNode,
    {
        let index = match self.modules.iter().position(|m| m.name == name) {
            Some(index) => index,
            None => {
                self.modules.push(create());
                self.modules.len() - 1
            }
        };
        &mut self.modules[index]
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModuleNode> {
        self.modules.iter_mut()
    }

    /// Module names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }
}

impl IntoIterator for ModuleMap {
    type Item = ModuleNode;
    type IntoIter = std::vec::IntoIter<ModuleNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.into_iter()
    }
}

use crate::content::parts::Part;

/// A role-tagged turn: `{"role":"user","parts":[...]}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Content {
    /// Who produced the turn: "user" or "model"
    role: Role,

    /// The ordered parts of the turn
    parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    pub fn user(parts: Vec<Part>) -> Self {
        Self::new(Role::User, parts)
    }

    pub fn builder() -> ContentBuilder {
        ContentBuilder::new()
    }

    pub fn role(&self) -> Role {
        self.role.clone()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

pub struct ContentBuilder {
    content: Content,
}

impl Default for ContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self {
            content: Content {
                role: Role::User,
                parts: Vec::new(),
            },
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.content.role = role;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.content.parts.push(Part::text(text));
        self
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.content.parts.push(part);
        self
    }

    pub fn build(self) -> Content {
        self.content
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Model,
}

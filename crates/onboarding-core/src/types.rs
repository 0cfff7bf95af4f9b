use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Life domain the user picked during onboarding, e.g. "Career" or "Health".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainTemplate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DomainTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// # Errors
    ///
    /// Returns an error if the domain name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingTemplateName("domain"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskTemplate>,
}

impl ProjectTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// The first goal the user commits to, with optional starter projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTemplate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub projects: Vec<ProjectTemplate>,
}

impl GoalTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            projects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_project(mut self, project: ProjectTemplate) -> Self {
        self.projects.push(project);
        self
    }

    /// # Errors
    ///
    /// Returns an error if the goal or any of its projects or tasks has a blank name.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingTemplateName("goal"));
        }
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(CoreError::MissingTemplateName("project"));
            }
            if project.tasks.iter().any(|task| task.name.trim().is_empty()) {
                return Err(CoreError::MissingTemplateName("task"));
            }
        }
        Ok(())
    }
}

//! Read-only portfolio content and the showcase panels built from it.

use std::collections::HashSet;
use std::str::FromStr;

use folio_protocol::{
    CurrentRole, Experience, Profile, ProfileLinks, Project, ProjectCategory, SkillCategory,
};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

const BUNDLED: &str = include_str!("../data/portfolio.json");

/// Projects beyond this count are left out of the showcase list.
pub const SHOWCASE_PROJECT_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub skills: Vec<SkillCategory>,
}

impl Portfolio {
    pub fn from_json(data: &[u8]) -> Result<Self, ContentError> {
        let portfolio: Portfolio = serde_json::from_slice(data)?;
        portfolio.check_unique_ids()?;
        Ok(portfolio)
    }

    /// The sample content shipped with the crate.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(BUNDLED.as_bytes())
    }

    pub fn projects_matching(&self, filter: ProjectFilter) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(move |p| filter.matches(p))
    }

    /// Items listed in a showcase panel, in display order. `filter` only
    /// narrows the project panel.
    pub fn showcase_items(
        &self,
        section: ShowcaseSection,
        filter: ProjectFilter,
    ) -> Vec<ShowcaseItem<'_>> {
        match section {
            ShowcaseSection::Projects => self
                .projects_matching(filter)
                .take(SHOWCASE_PROJECT_LIMIT)
                .map(ShowcaseItem::Project)
                .collect(),
            ShowcaseSection::Experience => {
                self.experience.iter().map(ShowcaseItem::Experience).collect()
            }
            ShowcaseSection::Skills => self.skills.iter().map(ShowcaseItem::Skills).collect(),
            ShowcaseSection::Background => vec![
                ShowcaseItem::Bio(&self.profile.bio),
                ShowcaseItem::CurrentRole(&self.profile.current_role),
                ShowcaseItem::Links(&self.profile.links),
            ],
        }
    }

    fn check_unique_ids(&self) -> Result<(), ContentError> {
        check_unique("project", self.projects.iter().map(|p| p.id.as_str()))?;
        check_unique("experience", self.experience.iter().map(|e| e.id.as_str()))?;
        check_unique("skill category", self.skills.iter().map(|s| s.name.as_str()))
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

/// Which projects the project panel lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProjectFilter {
    #[default]
    All,
    Featured,
    Category(ProjectCategory),
}

impl ProjectFilter {
    /// Cycle order of the filter control.
    pub const ALL: [ProjectFilter; 6] = [
        ProjectFilter::All,
        ProjectFilter::Featured,
        ProjectFilter::Category(ProjectCategory::Ai),
        ProjectFilter::Category(ProjectCategory::Mobile),
        ProjectFilter::Category(ProjectCategory::Frontend),
        ProjectFilter::Category(ProjectCategory::Devops),
    ];

    pub fn matches(self, project: &Project) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Featured => project.featured,
            ProjectFilter::Category(category) => project.category == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectFilter::All => "All Projects",
            ProjectFilter::Featured => "Featured",
            ProjectFilter::Category(ProjectCategory::Ai) => "AI & Machine Learning",
            ProjectFilter::Category(ProjectCategory::Mobile) => "Mobile Development",
            ProjectFilter::Category(ProjectCategory::Frontend) => "Frontend & UI",
            ProjectFilter::Category(ProjectCategory::Devops) => "DevOps & Infrastructure",
        }
    }

    pub fn next(self) -> Self {
        let position = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(position + 1) % Self::ALL.len()]
    }
}

/// Parses `"all"`, `"featured"`, or a category name such as `"ai"`.
impl FromStr for ProjectFilter {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ProjectFilter::All),
            "featured" => Ok(ProjectFilter::Featured),
            other => serde_json::from_value(serde_json::Value::String(other.to_owned()))
                .map(ProjectFilter::Category)
                .map_err(|_| ContentError::UnknownFilter(other.to_owned())),
        }
    }
}

/// The four panels of the scroll showcase, in scroll order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowcaseSection {
    Projects,
    Experience,
    Skills,
    Background,
}

impl ShowcaseSection {
    pub const ALL: [ShowcaseSection; 4] = [
        ShowcaseSection::Projects,
        ShowcaseSection::Experience,
        ShowcaseSection::Skills,
        ShowcaseSection::Background,
    ];

    pub fn at(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn id(self) -> &'static str {
        match self {
            ShowcaseSection::Projects => "projects",
            ShowcaseSection::Experience => "experience",
            ShowcaseSection::Skills => "skills",
            ShowcaseSection::Background => "background",
        }
    }

    /// Two-digit step number, `"01"` for the first panel.
    pub fn number(self) -> String {
        let position = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        format!("{:02}", position + 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            ShowcaseSection::Projects => "Projects",
            ShowcaseSection::Experience => "Experience",
            ShowcaseSection::Skills => "Skills",
            ShowcaseSection::Background => "Background",
        }
    }

    pub fn header(self) -> (&'static str, &'static str) {
        match self {
            ShowcaseSection::Projects => (
                "Featured Work",
                "AI engineering, mobile development, and production systems",
            ),
            ShowcaseSection::Experience => (
                "Work History",
                "From AI engineering to enterprise consulting",
            ),
            ShowcaseSection::Skills => (
                "Skills & Technologies",
                "Technical expertise across the stack",
            ),
            ShowcaseSection::Background => ("About Me", "Background and contact information"),
        }
    }
}

/// One entry of a showcase panel, borrowed from the portfolio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShowcaseItem<'a> {
    Project(&'a Project),
    Experience(&'a Experience),
    Skills(&'a SkillCategory),
    Bio(&'a str),
    CurrentRole(&'a CurrentRole),
    Links(&'a ProfileLinks),
}

/// Compact row shown in the list panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub title: String,
    pub subtitle: String,
    pub trailing: Option<String>,
}

impl ShowcaseItem<'_> {
    pub fn list_row(&self) -> ListRow {
        match self {
            ShowcaseItem::Project(project) => ListRow {
                title: project.title.clone(),
                subtitle: project.subtitle.clone(),
                trailing: None,
            },
            ShowcaseItem::Experience(exp) => ListRow {
                title: exp.company.clone(),
                subtitle: exp.role.clone(),
                trailing: Some(exp.period.clone()),
            },
            ShowcaseItem::Skills(category) => ListRow {
                title: category.name.clone(),
                subtitle: format!("{} skills", category.skills.len()),
                trailing: None,
            },
            ShowcaseItem::Bio(_) => ListRow {
                title: "Bio".into(),
                subtitle: "About".into(),
                trailing: None,
            },
            ShowcaseItem::CurrentRole(role) => ListRow {
                title: "Current Role".into(),
                subtitle: role.title.clone(),
                trailing: None,
            },
            ShowcaseItem::Links(_) => ListRow {
                title: "Connect".into(),
                subtitle: "Get in Touch".into(),
                trailing: None,
            },
        }
    }
}

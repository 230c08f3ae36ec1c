//! Skill normalization and related-skill lookup.
//!
//! `SkillTaxonomy` is the seam the skill scorer depends on. The built-in
//! `StaticSkillTaxonomy` is an in-memory alias table, category table and an
//! undirected graph of related skills with similarity weights.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSkill {
    pub normalized: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedSkill {
    pub skill: String,
    pub similarity: f64, // 0.0 – 1.0
}

pub trait SkillTaxonomy: Send + Sync {
    fn normalize_skill(&self, raw: &str) -> NormalizedSkill;

    /// Up to `top_n` neighbours of `skill`, most similar first.
    fn find_related_skills(&self, skill: &str, top_n: usize) -> Vec<RelatedSkill>;
}

/// alias → canonical form
static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let table: &[(&str, &[&str])] = &[
        ("javascript", &["js", "ecmascript", "es6", "java script"]),
        ("typescript", &["ts", "type script"]),
        ("node.js", &["nodejs", "node js", "node"]),
        ("react", &["reactjs", "react.js", "react js"]),
        ("vue", &["vuejs", "vue.js", "vue js"]),
        ("angular", &["angularjs", "angular.js"]),
        ("next.js", &["nextjs", "next js"]),
        ("express", &["expressjs", "express.js"]),
        ("postgresql", &["postgres", "postgre sql", "psql"]),
        ("mongodb", &["mongo", "mongo db"]),
        ("kubernetes", &["k8s", "kube"]),
        ("docker", &["docker containers", "containerization"]),
        ("aws", &["amazon web services", "amazon aws"]),
        ("gcp", &["google cloud", "google cloud platform"]),
        ("azure", &["microsoft azure", "ms azure"]),
        ("go", &["golang"]),
        ("python", &["python3", "python 3", "py"]),
        ("c++", &["cpp", "cplusplus"]),
        ("c#", &["csharp", "c sharp"]),
        ("machine learning", &["ml"]),
        ("deep learning", &["dl"]),
        ("ci/cd", &["cicd", "ci cd", "continuous integration"]),
        ("spring boot", &["springboot", "spring"]),
        ("good manufacturing practice", &["gmp"]),
        ("fda regulations", &["fda"]),
        ("rest api", &["rest", "restful api", "restful apis", "rest apis"]),
    ];

    let mut map = HashMap::new();
    for (canonical, aliases) in table {
        for alias in *aliases {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// canonical skill → category
static CATEGORIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let table: &[(&str, &[&str])] = &[
        (
            "programming",
            &[
                "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust", "r",
                "sas", "sql", "ruby", "php", "kotlin", "swift", "scala",
            ],
        ),
        (
            "frontend",
            &["react", "vue", "angular", "next.js", "html", "css", "svelte", "redux"],
        ),
        (
            "backend",
            &["node.js", "express", "django", "flask", "spring boot", "rest api", "graphql"],
        ),
        (
            "database",
            &["postgresql", "mysql", "mongodb", "redis", "sqlite", "elasticsearch"],
        ),
        ("cloud", &["aws", "gcp", "azure"]),
        ("devops", &["docker", "kubernetes", "terraform", "ci/cd", "jenkins", "ansible"]),
        (
            "data_science",
            &[
                "machine learning", "deep learning", "data analysis", "statistics",
                "data visualization", "pytorch", "tensorflow", "pandas",
            ],
        ),
        (
            "clinical_research",
            &["clinical research", "clinical trials", "drug development"],
        ),
        (
            "regulatory_affairs",
            &["fda regulations", "ema guidelines", "drug registration", "compliance"],
        ),
        (
            "quality_assurance",
            &["quality assurance", "quality control", "validation", "good manufacturing practice"],
        ),
        (
            "pharmacovigilance",
            &["drug safety", "adverse event reporting", "signal detection"],
        ),
        ("bioinformatics", &["bioinformatics", "genomics", "proteomics"]),
    ];

    let mut map = HashMap::new();
    for (category, skills) in table {
        for skill in *skills {
            map.insert(*skill, *category);
        }
    }
    map
});

/// Undirected related-skill edges between canonical names.
const RELATED_EDGES: &[(&str, &str, f64)] = &[
    ("javascript", "typescript", 0.95),
    ("javascript", "node.js", 0.85),
    ("javascript", "react", 0.75),
    ("javascript", "vue", 0.75),
    ("typescript", "angular", 0.75),
    ("react", "next.js", 0.92),
    ("react", "vue", 0.80),
    ("react", "angular", 0.75),
    ("react", "redux", 0.85),
    ("vue", "angular", 0.75),
    ("node.js", "express", 0.92),
    ("node.js", "typescript", 0.75),
    ("python", "django", 0.80),
    ("python", "flask", 0.80),
    ("python", "pandas", 0.80),
    ("django", "flask", 0.85),
    ("java", "kotlin", 0.85),
    ("java", "spring boot", 0.85),
    ("java", "scala", 0.75),
    ("c++", "c#", 0.70),
    ("c++", "rust", 0.75),
    ("postgresql", "mysql", 0.91),
    ("postgresql", "sql", 0.85),
    ("mysql", "sql", 0.85),
    ("sqlite", "sql", 0.80),
    ("mongodb", "redis", 0.70),
    ("docker", "kubernetes", 0.85),
    ("kubernetes", "terraform", 0.70),
    ("ci/cd", "jenkins", 0.85),
    ("aws", "gcp", 0.80),
    ("aws", "azure", 0.80),
    ("gcp", "azure", 0.80),
    ("machine learning", "deep learning", 0.90),
    ("machine learning", "statistics", 0.75),
    ("machine learning", "data analysis", 0.75),
    ("deep learning", "pytorch", 0.85),
    ("deep learning", "tensorflow", 0.85),
    ("pytorch", "tensorflow", 0.91),
    ("data analysis", "statistics", 0.85),
    ("data analysis", "data visualization", 0.80),
    ("clinical research", "clinical trials", 0.95),
    ("clinical research", "drug development", 0.80),
    ("fda regulations", "ema guidelines", 0.85),
    ("fda regulations", "compliance", 0.75),
    ("quality assurance", "quality control", 0.92),
    ("quality assurance", "validation", 0.75),
    ("good manufacturing practice", "quality control", 0.80),
    ("drug safety", "adverse event reporting", 0.90),
    ("drug safety", "signal detection", 0.80),
    ("bioinformatics", "genomics", 0.85),
    ("genomics", "proteomics", 0.80),
];

/// Collapses whitespace and lowercases. Aliases are not applied here.
pub fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Built-in taxonomy backed by static tables.
#[derive(Debug, Default, Clone)]
pub struct StaticSkillTaxonomy;

impl SkillTaxonomy for StaticSkillTaxonomy {
    fn normalize_skill(&self, raw: &str) -> NormalizedSkill {
        let key = canonical_key(raw);
        let normalized = ALIASES
            .get(key.as_str())
            .map(|c| c.to_string())
            .unwrap_or(key);
        let category = CATEGORIES.get(normalized.as_str()).map(|c| c.to_string());
        NormalizedSkill {
            normalized,
            category,
        }
    }

    fn find_related_skills(&self, skill: &str, top_n: usize) -> Vec<RelatedSkill> {
        let skill = self.normalize_skill(skill).normalized;

        let mut related: Vec<RelatedSkill> = RELATED_EDGES
            .iter()
            .filter_map(|&(a, b, similarity)| {
                if a == skill {
                    Some(RelatedSkill {
                        skill: b.to_string(),
                        similarity,
                    })
                } else if b == skill {
                    Some(RelatedSkill {
                        skill: a.to_string(),
                        similarity,
                    })
                } else {
                    None
                }
            })
            .collect();

        related.sort_by(|x, y| {
            y.similarity
                .total_cmp(&x.similarity)
                .then_with(|| x.skill.cmp(&y.skill))
        });
        related.truncate(top_n);
        related
    }
}

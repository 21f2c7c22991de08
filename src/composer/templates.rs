use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    CodeReview,
    Testing,
    Optimization,
    Security,
    Documentation,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateCategory::CodeReview => "code-review",
            TemplateCategory::Testing => "testing",
            TemplateCategory::Optimization => "optimization",
            TemplateCategory::Security => "security",
            TemplateCategory::Documentation => "documentation",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub body: &'static str,
    pub category: TemplateCategory,
}

pub static TEMPLATES: [PromptTemplate; 5] = [
    PromptTemplate {
        name: "🔍 Code Review",
        description: "Analyze code for bugs, security issues, and improvements",
        body: "Please review this code for:\n1. Potential bugs and edge cases\n2. Security vulnerabilities\n3. Performance optimizations\n4. Code style and best practices\n5. Suggest improvements",
        category: TemplateCategory::CodeReview,
    },
    PromptTemplate {
        name: "🧪 Generate Tests",
        description: "Create comprehensive unit tests for the code",
        body: "Please generate comprehensive unit tests for this code including:\n1. Happy path tests\n2. Edge case tests\n3. Error handling tests\n4. Mock setup if needed",
        category: TemplateCategory::Testing,
    },
    PromptTemplate {
        name: "⚡ Optimize Performance",
        description: "Analyze and optimize code performance",
        body: "Please analyze this code for performance issues and suggest:\n1. Algorithm improvements\n2. Memory optimizations\n3. I/O optimizations\n4. Time complexity analysis",
        category: TemplateCategory::Optimization,
    },
    PromptTemplate {
        name: "🔒 Security Audit",
        description: "Scan code for security vulnerabilities",
        body: "Please perform a security audit of this code looking for:\n1. SQL injection vulnerabilities\n2. XSS vulnerabilities\n3. Input validation issues\n4. Authentication/authorization flaws\n5. Secure coding practices",
        category: TemplateCategory::Security,
    },
    PromptTemplate {
        name: "📚 Add Documentation",
        description: "Generate comprehensive code documentation",
        body: "Please add comprehensive documentation to this code including:\n1. Function/class descriptions\n2. Parameter documentation\n3. Return value documentation\n4. Usage examples\n5. Inline comments for complex logic",
        category: TemplateCategory::Documentation,
    },
];

/// Lookup by 1-based position, as listed by `/templates`.
pub fn by_position(position: usize) -> Option<&'static PromptTemplate> {
    position.checked_sub(1).and_then(|index| TEMPLATES.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_covers_every_category_once() {
        let categories: Vec<_> = TEMPLATES.iter().map(|t| t.category.to_string()).collect();
        assert_eq!(
            categories,
            vec!["code-review", "testing", "optimization", "security", "documentation"]
        );
    }

    #[test]
    fn positions_are_one_based() {
        assert!(by_position(0).is_none());
        assert_eq!(by_position(1).unwrap().name, "🔍 Code Review");
        assert_eq!(by_position(5).unwrap().category, TemplateCategory::Documentation);
        assert!(by_position(6).is_none());
    }
}

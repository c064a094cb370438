//! Style guide and glossary injected into every system prompt

use serde::{Deserialize, Serialize};

/// One glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// The term as it must appear
    pub term: String,

    /// Its agreed meaning
    pub definition: String,
}

impl GlossaryTerm {
    /// Create a glossary entry
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Writing conventions for generated pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGuide {
    /// Output language tag
    pub language: String,

    /// Overall tone
    pub tone: String,

    /// Writing rules, in priority order
    pub rules: Vec<String>,

    /// Terms that must be used consistently
    pub glossary: Vec<GlossaryTerm>,
}

impl Default for StyleGuide {
    fn default() -> Self {
        Self {
            language: "zh-CN".to_string(),
            tone: "专业、简洁、科技商务".to_string(),
            rules: [
                "所有输出必须为简体中文",
                "优先使用短句，结论先行，补充随后",
                "避免使用夸张营销词（如'颠覆''极致'）",
                "禁止输出英文、emoji 或多余符号",
                "title应保持原文术语的准确性和完整性",
                "content应包含核心功能描述和关键技术细节",
                "充分利用字数限制，提供高信息密度的内容",
                "要点去重，避免同义重复",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
            glossary: vec![
                GlossaryTerm::new("模板库", "标准化页面结构与样式集合"),
                GlossaryTerm::new("自动排版", "基于规则或模型的文本块布局与层级分配"),
                GlossaryTerm::new("一致性", "保证跨页/跨文档的术语和风格统一"),
                GlossaryTerm::new("数据驱动", "利用输入数据自动生成或优化内容"),
                GlossaryTerm::new("复用率", "内容在不同场景下的可重复使用程度"),
                GlossaryTerm::new("AI Agent", "人工智能代理，大模型与业务应用的智能桥梁"),
                GlossaryTerm::new("PDCA闭环", "计划-执行-检查-改进的管理循环"),
                GlossaryTerm::new("穿透式管理", "跨层级、跨部门的一体化综合管控"),
            ],
        }
    }
}

impl StyleGuide {
    /// Number of writing rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of glossary terms
    pub fn glossary_count(&self) -> usize {
        self.glossary.len()
    }

    /// Rules joined for prompt injection
    pub fn rules_line(&self) -> String {
        self.rules.join("；")
    }

    /// Glossary rendered as `term=definition` pairs
    pub fn glossary_line(&self) -> String {
        self.glossary
            .iter()
            .map(|g| format!("{}={}", g.term, g.definition))
            .collect::<Vec<_>>()
            .join("；")
    }
}

//! Prompt assembly for page design

use crate::input::PageInput;
use crate::style::StyleGuide;
use pagesmith_domain::{CompletionRequest, Constraints};

/// Builds system and user prompts for one design run
pub struct PromptBuilder<'a> {
    style: &'a StyleGuide,
    constraints: Constraints,
    title_max_len: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder
    pub fn new(style: &'a StyleGuide, constraints: Constraints, title_max_len: usize) -> Self {
        Self {
            style,
            constraints,
            title_max_len,
        }
    }

    /// Build the complete request
    pub fn build(&self, input: &PageInput, layout_hint: &str, temperature: f32) -> CompletionRequest {
        CompletionRequest::new(self.system_prompt(), self.user_prompt(input, layout_hint))
            .with_temperature(temperature)
    }

    /// Tone, rules, glossary, bounds and output contract
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and style
        prompt.push_str(ROLE_INSTRUCTIONS);
        prompt.push('\n');
        prompt.push_str(&format!("【语气】{}\n", self.style.tone));
        prompt.push_str(&format!("【规则】{}\n", self.style.rules_line()));
        prompt.push_str(&format!("【术语表】{}\n\n", self.style.glossary_line()));

        // 2. Task and bounds
        prompt.push_str(TASK_INSTRUCTIONS);
        prompt.push('\n');
        prompt.push_str(&format!(
            "硬性约束：1) blocks 数量在 {}–{} 之间；2) 每个 title ≤ {} 字；3) 每个 content ≤ {} 字；4) 要点去重，避免同义重复。\n",
            self.constraints.min_blocks,
            self.constraints.max_blocks,
            self.title_max_len,
            self.constraints.max_content_len,
        ));

        // 3. Output contract
        prompt.push_str(OUTPUT_GUARDRAILS);
        prompt.push('\n');
        prompt.push_str(SCHEMA_HINT);

        prompt
    }

    /// Page data, preferred layout and a schema example
    pub fn user_prompt(&self, input: &PageInput, layout_hint: &str) -> String {
        format!(
            "document_title: {}\npage_data: {}\n请仅输出JSON，符合约束，layout_hint优先使用：{}\n{}",
            input.document_title, input.page_data, layout_hint, SCHEMA_EXAMPLE
        )
    }
}

const ROLE_INSTRUCTIONS: &str = "你是页面设计助手，请严格按照以下风格与约束生成内容：";

const TASK_INSTRUCTIONS: &str = "任务：根据输入的 document_title 与 page_data，输出仅包含 JSON 的结构化结果：\n\
{document_title, page_title, layout_hint, blocks:[{title, content}...]}";

const OUTPUT_GUARDRAILS: &str = "务必严格遵守：仅输出合法 JSON（一个对象），不要输出任何解释、前后缀文字、\
代码围栏、注释或多余字符。不要输出Markdown。";

const SCHEMA_HINT: &str = "JSON键必须为：document_title、page_title、layout_hint、blocks；\
blocks为数组，每项包含title与content两个键。";

const SCHEMA_EXAMPLE: &str = r#"JSON示例：{"document_title":"开发四大AI赋能的管控数字化应用","page_title":"四大AI赋能的管控数字化应用","layout_hint":"grid-2-2","blocks":[{"title":"全流程工作质效管理平台","content":"通过项目化管理实现重点任务PDCA闭环，利用AI Agent赋能智能立项与任务分解。"},{"title":"智能会议管理系统","content":"根据语音转写自动生成会议纪要，并推送到质效管理平台。"}]}"#;

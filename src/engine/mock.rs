//! Canned catalog and response data standing in for a real provider

use rand::seq::SliceRandom;

use crate::models::{Model, Template};

/// Canned assistant replies; one is picked uniformly at random per send
pub const MOCK_RESPONSES: [&str; 3] = [
    "This is a simulated response from the AI model. In a production \
     environment, this would connect to a real API endpoint.",
    "Based on your prompt, here's a detailed analysis with multiple points \
     to consider:\n\n1. First consideration\n2. Second point of interest\n\
     3. Additional insights\n\nWould you like me to elaborate on any of these?",
    "I've processed your request. Here are the key findings:\n\n\
     - Technical implementation details\n- Best practices recommendation\n\
     - Potential edge cases to consider\n\nLet me know if you need further \
     clarification!",
];

/// Session-static model catalog
pub fn model_catalog() -> Vec<Model> {
    vec![
        Model::new("gpt-4", "GPT-4", "OpenAI", 8192),
        Model::new("gpt-3.5-turbo", "GPT-3.5 Turbo", "OpenAI", 4096),
        Model::new("claude-2", "Claude 2", "Anthropic", 100_000),
        Model::new("custom-model", "Custom Fine-tuned", "Custom", 2048),
    ]
}

/// Built-in prompt templates
pub fn template_catalog() -> Vec<Template> {
    vec![
        Template::new(
            "t1",
            "Code Review",
            "Review the following code and provide feedback on:\n1. Code quality\n\
             2. Best practices\n3. Potential bugs\n4. Performance optimizations\n\n\
             Code:\n[INSERT CODE HERE]",
            "Development",
        ),
        Template::new(
            "t2",
            "Content Summary",
            "Please provide a concise summary of the following content, \
             highlighting the key points:\n\n[INSERT CONTENT HERE]",
            "Writing",
        ),
        Template::new(
            "t3",
            "Creative Brainstorm",
            "Generate 10 creative ideas for:\n\nTopic: [INSERT TOPIC]\n\
             Target Audience: [INSERT AUDIENCE]\nConstraints: [INSERT CONSTRAINTS]",
            "Creative",
        ),
        Template::new(
            "t4",
            "Debug Helper",
            "Help me debug this error:\n\nError Message: [INSERT ERROR]\n\
             Code Context: [INSERT CODE]\nExpected Behavior: [INSERT EXPECTATION]",
            "Development",
        ),
    ]
}

/// Pick one canned reply uniformly at random
pub fn pick_response() -> String {
    let mut rng = rand::thread_rng();
    MOCK_RESPONSES
        .choose(&mut rng)
        .copied()
        .unwrap_or(MOCK_RESPONSES[0])
        .to_string()
}

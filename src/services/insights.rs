use crate::error::{AppError, AppResult};
use crate::models::{fallback_insights, AiInsight, AiProvider, AiSettings, FinancialProfile};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a professional financial advisor for users in India. \
All amounts are in Indian Rupees (INR).

You MUST respond with valid JSON in this exact format:
{\"insights\": [
  {\"title\": \"<short title>\", \"description\": \"<one or two sentences>\", \
\"type\": \"positive|warning|info|suggestion\", \
\"category\": \"Goal|Tax|Savings|Investment|Debt\", \"impact\": \"High|Medium|Low\"}
]}";

/// Create an HTTP client with the configured timeout
fn create_client(settings: &AiSettings) -> AppResult<Client> {
    Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Fetch insights for a profile, falling back to the canned list on any failure.
///
/// Never returns an error: the dashboard always has something to show once
/// this settles. One request per call, no retries.
pub async fn fetch_insights(settings: &AiSettings, profile: &FinancialProfile) -> Vec<AiInsight> {
    match request_insights(settings, profile).await {
        Ok(insights) => {
            debug!(
                provider = settings.provider.as_str(),
                count = insights.len(),
                "Received AI insights"
            );
            insights
        }
        Err(e) => {
            warn!(
                provider = settings.provider.as_str(),
                error = %e,
                "Insight request failed, using fallback insights"
            );
            fallback_insights()
        }
    }
}

/// Request insights from the configured provider, surfacing every failure.
pub async fn request_insights(
    settings: &AiSettings,
    profile: &FinancialProfile,
) -> AppResult<Vec<AiInsight>> {
    if !settings.is_configured() {
        return Err(AppError::Internal(format!(
            "{} is not configured",
            settings.provider.label()
        )));
    }

    let prompt = build_prompt(profile);

    let content = match settings.provider {
        AiProvider::Gemini => generate_with_gemini(settings, &prompt).await?,
        AiProvider::OpenAi => generate_with_openai_compatible(settings, &prompt).await?,
        AiProvider::Ollama => generate_with_ollama(settings, &prompt).await?,
        AiProvider::Anthropic => generate_with_anthropic(settings, &prompt).await?,
    };

    parse_insights(&content)
}

pub fn build_prompt(profile: &FinancialProfile) -> String {
    let financials = &profile.financials;
    let goal = &profile.goal;
    let investments = &profile.investments;

    format!(
        r#"Analyze the following financial data for a user in India.
All values are in Indian Rupees (INR).
User: {name}, Age: {age}
Monthly Income: {income}
Monthly Expenses: {expenses}
Monthly Debt: {debt}
Emergency Fund Opted: {em_fund}
Goal: {goal} (Target: {target} in {months} months)
Current Investment: {invested}
Risk Profile: {risk}

Provide 5-6 professional financial insights and actionable suggestions.
Include:
1. Goal feasibility and specific monthly SIP requirement.
2. Expense-to-income ratio analysis.
3. Tax-saving suggestions (mentioning 80C/80D/NPS if applicable).
4. Emergency fund adequacy (suggesting 6 months of expenses).
5. Asset allocation based on their {risk} risk profile.
6. Debt management advice."#,
        name = profile.name,
        age = profile.age,
        income = financials.monthly_income,
        expenses = financials.monthly_expenses,
        debt = financials.monthly_debt_payment,
        em_fund = financials.emergency_fund_opted,
        goal = goal.label,
        target = goal.target_amount,
        months = goal.target_time_months,
        invested = investments.invested_amount,
        risk = investments.risk_profile,
    )
}

/// JSON schema handed to Gemini so the answer comes back as an insight array.
fn gemini_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "description": {"type": "STRING"},
                "type": {
                    "type": "STRING",
                    "enum": ["positive", "warning", "info", "suggestion"]
                },
                "category": {
                    "type": "STRING",
                    "enum": ["Goal", "Tax", "Savings", "Investment", "Debt"]
                },
                "impact": {
                    "type": "STRING",
                    "enum": ["High", "Medium", "Low"]
                }
            },
            "required": ["title", "description", "type", "category", "impact"]
        }
    })
}

async fn generate_with_gemini(settings: &AiSettings, prompt: &str) -> AppResult<String> {
    let client = create_client(settings)?;
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        settings.base_url.trim_end_matches('/'),
        settings.model
    );

    #[derive(Serialize)]
    struct Part {
        text: String,
    }

    #[derive(Serialize)]
    struct Content {
        role: String,
        parts: Vec<Part>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct GenerationConfig {
        response_mime_type: String,
        response_schema: serde_json::Value,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct GeminiRequest {
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    }

    #[derive(Deserialize)]
    struct GeminiResponse {
        #[serde(default)]
        candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    struct Candidate {
        content: CandidateContent,
    }

    #[derive(Deserialize)]
    struct CandidateContent {
        #[serde(default)]
        parts: Vec<CandidatePart>,
    }

    #[derive(Deserialize)]
    struct CandidatePart {
        text: Option<String>,
    }

    let request = GeminiRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: gemini_response_schema(),
        },
    };

    debug!(model = %settings.model, "Sending insight request to Gemini");

    let response = client
        .post(&url)
        .header("x-goog-api-key", &settings.api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Gemini request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Internal(format!(
            "Gemini API returned {}: {}",
            status, body
        )));
    }

    let gemini_response: GeminiResponse = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse Gemini response: {}", e)))?;

    Ok(gemini_response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .and_then(|p| p.text.clone())
        .unwrap_or_default())
}

async fn generate_with_openai_compatible(
    settings: &AiSettings,
    prompt: &str,
) -> AppResult<String> {
    let client = create_client(settings)?;
    let url = format!(
        "{}/chat/completions",
        settings.base_url.trim_end_matches('/')
    );

    #[derive(Serialize)]
    struct Message {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct OpenAiRequest {
        model: String,
        messages: Vec<Message>,
        temperature: f64,
        response_format: ResponseFormat,
    }

    #[derive(Serialize)]
    struct ResponseFormat {
        r#type: String,
    }

    #[derive(Deserialize)]
    struct OpenAiResponse {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ChoiceMessage,
    }

    #[derive(Deserialize)]
    struct ChoiceMessage {
        content: String,
    }

    let request = OpenAiRequest {
        model: settings.model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ],
        temperature: 0.4,
        response_format: ResponseFormat {
            r#type: "json_object".to_string(),
        },
    };

    debug!(model = %settings.model, "Sending insight request to OpenAI-compatible API");

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", settings.api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("OpenAI request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Internal(format!(
            "OpenAI API returned {}: {}",
            status, body
        )));
    }

    let openai_response: OpenAiResponse = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse OpenAI response: {}", e)))?;

    Ok(openai_response
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .unwrap_or_default())
}

async fn generate_with_ollama(settings: &AiSettings, prompt: &str) -> AppResult<String> {
    let client = create_client(settings)?;
    let url = format!("{}/api/generate", settings.base_url.trim_end_matches('/'));

    #[derive(Serialize)]
    struct OllamaRequest {
        model: String,
        prompt: String,
        system: String,
        stream: bool,
        format: String,
    }

    #[derive(Deserialize)]
    struct OllamaResponse {
        response: String,
    }

    let request = OllamaRequest {
        model: settings.model.clone(),
        prompt: prompt.to_string(),
        system: SYSTEM_PROMPT.to_string(),
        stream: false,
        format: "json".to_string(),
    };

    debug!(model = %settings.model, "Sending insight request to Ollama");

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Ollama request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Internal(format!(
            "Ollama returned {}: {}",
            status, body
        )));
    }

    let ollama_response: OllamaResponse = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse Ollama response: {}", e)))?;

    Ok(ollama_response.response)
}

async fn generate_with_anthropic(settings: &AiSettings, prompt: &str) -> AppResult<String> {
    let client = create_client(settings)?;
    let url = format!("{}/v1/messages", settings.base_url.trim_end_matches('/'));

    #[derive(Serialize)]
    struct Message {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct AnthropicRequest {
        model: String,
        max_tokens: i32,
        system: String,
        messages: Vec<Message>,
    }

    #[derive(Deserialize)]
    struct AnthropicResponse {
        content: Vec<ContentBlock>,
    }

    #[derive(Deserialize)]
    struct ContentBlock {
        text: Option<String>,
    }

    let request = AnthropicRequest {
        model: settings.model.clone(),
        max_tokens: 2048,
        system: SYSTEM_PROMPT.to_string(),
        messages: vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
    };

    debug!(model = %settings.model, "Sending insight request to Anthropic");

    let response = client
        .post(&url)
        .header("x-api-key", &settings.api_key)
        .header("anthropic-version", "2023-06-01")
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Anthropic request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Internal(format!(
            "Anthropic API returned {}: {}",
            status, body
        )));
    }

    let anthropic_response: AnthropicResponse = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse Anthropic response: {}", e)))?;

    Ok(anthropic_response
        .content
        .first()
        .and_then(|c| c.text.clone())
        .unwrap_or_default())
}

/// Parse the model's answer into insights, keeping order and content as given.
pub fn parse_insights(content: &str) -> AppResult<Vec<AiInsight>> {
    let json_str = extract_json_array(content);

    let insights: Vec<AiInsight> = serde_json::from_str(json_str).map_err(|e| {
        debug!(content = %content, error = %e, "Failed to parse AI response as insight list");
        AppError::Internal(format!("Failed to parse AI response: {}", e))
    })?;

    if insights.is_empty() {
        return Err(AppError::Internal("AI response contained no insights".into()));
    }

    Ok(insights)
}

/// Cut the outermost JSON array out of the content. Models wrap answers in
/// code fences or an `{"insights": [...]}` envelope often enough.
fn extract_json_array(content: &str) -> &str {
    if let (Some(start), Some(end)) = (content.find('['), content.rfind(']')) {
        if start < end {
            return &content[start..=end];
        }
    }
    content
}

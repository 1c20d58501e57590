use crate::models::{ClientLanguage, Locale, Protocol, SnippetRequest};
use crate::template::fill;

/** \brief 本地网关的回环地址。 */
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/** \brief 触发图片尺寸示例的模型前缀。 */
pub const IMAGE_MODEL_PREFIX: &str = "gemini-3-pro-image";

/** \brief 示例中使用的 Anthropic API 版本头。 */
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/**
 * \brief 中英文成对的注释文本（不含注释符号）。
 */
struct Localized {
    en: &'static str,
    zh: &'static str,
}

impl Localized {
    fn get(&self, locale: Locale) -> &'static str {
        if locale.is_zh() {
            self.zh
        } else {
            self.en
        }
    }

    fn comment(&self, marker: &str, locale: Locale) -> String {
        format!("{} {}", marker, self.get(locale))
    }
}

const LOOPBACK_TIP: Localized = Localized {
    en: "Recommended: Use 127.0.0.1 to avoid IPv6 resolution delays",
    zh: "推荐使用 127.0.0.1 以避免部分环境 IPv6 解析延迟问题",
};

const ANTHROPIC_SDK_NOTE: Localized = Localized {
    en: "Note: Antigravity supports calling any model via Anthropic SDK",
    zh: "注意: Antigravity 支持使用 Anthropic SDK 调用任意模型",
};

const ANTHROPIC_PROTOCOL_NOTE: Localized = Localized {
    en: "Note: Antigravity supports calling any model via the Anthropic protocol",
    zh: "注意: Antigravity 支持使用 Anthropic 协议调用任意模型",
};

const GEMINI_INSTALL: Localized = Localized {
    en: "Install: pip install google-generativeai",
    zh: "需要安装: pip install google-generativeai",
};

const GEMINI_PROXY: Localized = Localized {
    en: "Use Antigravity proxy address (Recommended 127.0.0.1)",
    zh: "使用 Antigravity 代理地址 (推荐 127.0.0.1)",
};

const GEMINI_COMPAT_SDK: Localized = Localized {
    en: "Recommended: Use OpenAI SDK compatibility mode for Gemini",
    zh: "推荐: 使用 OpenAI SDK 兼容模式调用 Gemini",
};

const GEMINI_COMPAT_HTTP: Localized = Localized {
    en: "Recommended: Use OpenAI compatibility mode for Gemini",
    zh: "推荐: 使用 OpenAI 兼容模式调用 Gemini",
};

const IMAGE_SIZE_METHOD: Localized = Localized {
    en: "Method 1: Use size parameter (Recommended)",
    zh: "方式 1: 使用 size 参数 (推荐)",
};

const IMAGE_SIZES: Localized = Localized {
    en: r#"Supports: "1024x1024" (1:1), "1280x720" (16:9), "720x1280" (9:16), "1216x896" (4:3)"#,
    zh: r#"支持: "1024x1024" (1:1), "1280x720" (16:9), "720x1280" (9:16), "1216x896" (4:3)"#,
};

const IMAGE_SUFFIX_METHOD: Localized = Localized {
    en: "Method 2: Use model suffix",
    zh: "方式 2: 使用模型后缀",
};

const IMAGE_SUFFIX_EXAMPLE: Localized = Localized {
    en: "e.g.: gemini-3-pro-image-16-9, gemini-3-pro-image-4-3",
    zh: "例如: gemini-3-pro-image-16-9, gemini-3-pro-image-4-3",
};

const GO_NO_SDK: Localized = Localized {
    en: "Anthropic does not have an official Go SDK yet, using standard library is recommended",
    zh: "Anthropic 官方目前尚未发布 Go SDK, 建议使用标准库或第三方库",
};

const RUST_NO_SDK: Localized = Localized {
    en: "Anthropic does not have an official Rust SDK yet, calling the Messages API with reqwest",
    zh: "Anthropic 官方目前尚未发布 Rust SDK, 此处直接使用 reqwest 调用 Messages API",
};

const RUST_COMPAT: Localized = Localized {
    en: "Recommended: Use async-openai crate (Compatibility Mode)",
    zh: "推荐: 使用 async-openai 库 (兼容模式)",
};

const PY_OPENAI: &str = r##"from openai import OpenAI

client = OpenAI(
    base_url="{base_url}",
    api_key="{api_key}"
)

response = client.chat.completions.create(
    model="{model}",
    messages=[{"role": "user", "content": "Hello"}]
)

print(response.choices[0].message.content)"##;

const PY_IMAGE: &str = r##"from openai import OpenAI

client = OpenAI(
    base_url="{base_url}",
    api_key="{api_key}"
)

response = client.chat.completions.create(
    model="{model}",
    {size_method}
    {sizes}
    extra_body={ "size": "1024x1024" },

    {suffix_method}
    {suffix_example}
    # model="gemini-3-pro-image-16-9",
    messages=[{
        "role": "user",
        "content": "Draw a futuristic city"
    }]
)

print(response.choices[0].message.content)"##;

const PY_ANTHROPIC: &str = r##"from anthropic import Anthropic

client = Anthropic(
    {loopback_tip}
    base_url="{host}",
    api_key="{api_key}"
)

{note}
response = client.messages.create(
    model="{model}",
    max_tokens=1024,
    messages=[{"role": "user", "content": "Hello"}]
)

print(response.content[0].text)"##;

const PY_GEMINI: &str = r##"{install}
import google.generativeai as genai

{proxy}
genai.configure(
    api_key="{api_key}",
    transport='rest',
    client_options={'api_endpoint': '{host}'}
)

model = genai.GenerativeModel('{model}')
response = model.generate_content("Hello")
print(response.text)"##;

const NODE_OPENAI: &str = r##"// npm install openai
import OpenAI from 'openai';

const client = new OpenAI({
  apiKey: '{api_key}',
  baseURL: '{base_url}',
});

async function main() {
  const chatCompletion = await client.chat.completions.create({
    messages: [{ role: 'user', content: 'Hello' }],
    model: '{model}',
  });

  console.log(chatCompletion.choices[0].message.content);
}

main();"##;

const NODE_IMAGE: &str = r##"// npm install openai
import OpenAI from 'openai';

const client = new OpenAI({
  apiKey: '{api_key}',
  baseURL: '{base_url}',
});

async function main() {
  const response = await client.chat.completions.create({
    model: '{model}',
    {size_method}
    extra_body: { "size": "1024x1024" },
    {suffix_method}
    {suffix_example}
    // model: 'gemini-3-pro-image-16-9',
    messages: [{ role: 'user', content: 'Draw a futuristic city' }],
  });

  console.log(response.choices[0].message.content);
}

main();"##;

const NODE_GEMINI: &str = r##"{compat}
// npm install openai
import OpenAI from 'openai';

const client = new OpenAI({
  apiKey: '{api_key}',
  baseURL: '{base_url}',
});

async function main() {
  const response = await client.chat.completions.create({
    model: '{model}',
    messages: [{ role: 'user', content: 'Hello' }],
  });

  console.log(response.choices[0].message.content);
}

main();"##;

const NODE_ANTHROPIC: &str = r##"// npm install @anthropic-ai/sdk
import Anthropic from '@anthropic-ai/sdk';

const client = new Anthropic({
  baseURL: '{host}',
  apiKey: '{api_key}',
});

async function main() {
  const message = await client.messages.create({
    max_tokens: 1024,
    messages: [{ role: 'user', content: 'Hello' }],
    model: '{model}',
  });

  console.log(message.content[0].text);
}

main();"##;

const GO_OPENAI: &str = r##"package main
{header}// go get github.com/sashabaranov/go-openai
import (
	"context"
	"fmt"
	openai "github.com/sashabaranov/go-openai"
)

func main() {
	config := openai.DefaultConfig("{api_key}")
	config.BaseURL = "{base_url}"
	client := openai.NewClientWithConfig(config)

	resp, err := client.CreateChatCompletion(
		context.Background(),
		openai.ChatCompletionRequest{
			Model: "{model}",
			Messages: []openai.ChatCompletionMessage{
				{
					Role:    openai.ChatMessageRoleUser,
					Content: "Hello",
				},
			},
		},
	)

	if err != nil {
		fmt.Printf("Error: %v\n", err)
		return
	}
	fmt.Println(resp.Choices[0].Message.Content)
}"##;

const GO_ANTHROPIC: &str = r##"package main
{note}
{no_sdk}
import (
	"bytes"
	"encoding/json"
	"fmt"
	"io/ioutil"
	"net/http"
)

func main() {
	url := "{host}/v1/messages"

	payload := map[string]interface{}{
		"model":      "{model}",
		"max_tokens": 1024,
		"messages": []map[string]string{
			{"role": "user", "content": "Hello"},
		},
	}
	jsonData, _ := json.Marshal(payload)

	req, _ := http.NewRequest("POST", url, bytes.NewBuffer(jsonData))
	req.Header.Set("x-api-key", "{api_key}")
	req.Header.Set("anthropic-version", "{anthropic_version}")
	req.Header.Set("content-type", "application/json")

	client := &http.Client{}
	resp, err := client.Do(req)
	if err != nil {
		fmt.Println("Error:", err)
		return
	}
	defer resp.Body.Close()

	body, _ := ioutil.ReadAll(resp.Body)
	fmt.Println(string(body))
}"##;

const CURL_OPENAI: &str = r##"{header}curl {base_url}/chat/completions \
  -H "Content-Type: application/json" \
  -H "Authorization: Bearer {api_key}" \
  -d '{
    "model": "{model}",
    "messages": [{"role": "user", "content": "Hello"}]
  }'"##;

const CURL_ANTHROPIC: &str = r##"{note}
curl {host}/v1/messages \
  -H "Content-Type: application/json" \
  -H "x-api-key: {api_key}" \
  -H "anthropic-version: {anthropic_version}" \
  -d '{
    "model": "{model}",
    "max_tokens": 1024,
    "messages": [{"role": "user", "content": "Hello"}]
  }'"##;

const RUST_OPENAI: &str = r##"// Cargo.toml: async-openai = "0.26.0"
use async_openai::{
    types::{CreateChatCompletionRequestArgs, ChatCompletionRequestMessage,
            ChatCompletionRequestUserMessageArgs},
    Client, config::OpenAIConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    {compat}
    let config = OpenAIConfig::new()
        .with_api_key("{api_key}")
        .with_api_base("{base_url}");
    let client = Client::with_config(config);

    let request = CreateChatCompletionRequestArgs::default()
        .model("{model}")
        .messages([
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content("Hello")
                    .build()?
            ),
        ])
        .build()?;

    let response = client.chat().create(request).await?;

    if let Some(choice) = response.choices.first() {
        println!("{}", choice.message.content.as_ref().unwrap_or(&"".to_string()));
    }

    Ok(())
}"##;

const RUST_ANTHROPIC: &str = r##"// Cargo.toml: reqwest = { version = "0.12", features = ["json"] }
//             serde_json = "1", tokio = { version = "1", features = ["full"] }
{note}
{no_sdk}
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = "{host}";
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/v1/messages", base_url))
        .header("x-api-key", "{api_key}")
        .header("anthropic-version", "{anthropic_version}")
        .json(&json!({
            "model": "{model}",
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": "Hello"}]
        }))
        .send()
        .await?;

    println!("{}", response.text().await?);
    Ok(())
}"##;

/**
 * \brief 不带版本后缀的回环地址，供 Anthropic 风格的 base URL 使用。
 */
pub fn loopback_host(port: i64) -> String {
    format!("http://{}:{}", LOOPBACK_HOST, port)
}

/**
 * \brief 带 `/v1` 后缀的回环地址，供 OpenAI 兼容客户端使用。
 */
pub fn loopback_base_url(port: i64) -> String {
    format!("{}/v1", loopback_host(port))
}

pub fn is_image_model(model_id: &str) -> bool {
    model_id.starts_with(IMAGE_MODEL_PREFIX)
}

/**
 * \brief 生成 Python 示例。
 * \details Gemini 协议使用原生 google-generativeai 客户端；图片模型仅在默认协议下特殊处理。
 */
pub fn python_example(
    model_id: &str,
    protocol: Protocol,
    port: i64,
    api_key: &str,
    lang: &str,
) -> String {
    let locale = Locale::from_lang(lang);
    let host = loopback_host(port);
    let base_url = loopback_base_url(port);

    match protocol {
        Protocol::Anthropic => fill(
            PY_ANTHROPIC,
            &[
                ("loopback_tip", LOOPBACK_TIP.comment("#", locale).as_str()),
                ("note", ANTHROPIC_SDK_NOTE.comment("#", locale).as_str()),
                ("host", host.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::Gemini => fill(
            PY_GEMINI,
            &[
                ("install", GEMINI_INSTALL.comment("#", locale).as_str()),
                ("proxy", GEMINI_PROXY.comment("#", locale).as_str()),
                ("host", host.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::OpenAI if is_image_model(model_id) => fill(
            PY_IMAGE,
            &[
                ("size_method", IMAGE_SIZE_METHOD.comment("#", locale).as_str()),
                ("sizes", IMAGE_SIZES.comment("#", locale).as_str()),
                ("suffix_method", IMAGE_SUFFIX_METHOD.comment("#", locale).as_str()),
                ("suffix_example", IMAGE_SUFFIX_EXAMPLE.comment("#", locale).as_str()),
                ("base_url", base_url.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::OpenAI => fill(
            PY_OPENAI,
            &[
                ("base_url", base_url.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
    }
}

/**
 * \brief 生成 Node.js 示例。
 */
pub fn nodejs_example(
    model_id: &str,
    protocol: Protocol,
    port: i64,
    api_key: &str,
    lang: &str,
) -> String {
    let locale = Locale::from_lang(lang);
    let base_url = loopback_base_url(port);

    match protocol {
        Protocol::Anthropic => fill(
            NODE_ANTHROPIC,
            &[
                ("host", loopback_host(port).as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::Gemini => fill(
            NODE_GEMINI,
            &[
                ("compat", GEMINI_COMPAT_SDK.comment("//", locale).as_str()),
                ("base_url", base_url.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::OpenAI if is_image_model(model_id) => fill(
            NODE_IMAGE,
            &[
                ("size_method", IMAGE_SIZE_METHOD.comment("//", locale).as_str()),
                ("suffix_method", IMAGE_SUFFIX_METHOD.comment("//", locale).as_str()),
                ("suffix_example", IMAGE_SUFFIX_EXAMPLE.comment("//", locale).as_str()),
                ("base_url", base_url.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::OpenAI => fill(
            NODE_OPENAI,
            &[
                ("base_url", base_url.as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
    }
}

/**
 * \brief 生成 Go 示例。
 * \details Anthropic 无官方 Go SDK，直接使用 net/http；Gemini 走 OpenAI 兼容模式。
 */
pub fn go_example(
    model_id: &str,
    protocol: Protocol,
    port: i64,
    api_key: &str,
    lang: &str,
) -> String {
    let locale = Locale::from_lang(lang);

    if protocol == Protocol::Anthropic {
        return fill(
            GO_ANTHROPIC,
            &[
                ("note", ANTHROPIC_PROTOCOL_NOTE.comment("//", locale).as_str()),
                ("no_sdk", GO_NO_SDK.comment("//", locale).as_str()),
                ("host", loopback_host(port).as_str()),
                ("anthropic_version", ANTHROPIC_VERSION),
                ("api_key", api_key),
                ("model", model_id),
            ],
        );
    }

    let header = match protocol {
        Protocol::Gemini => format!("{}\n", GEMINI_COMPAT_SDK.comment("//", locale)),
        _ => String::new(),
    };
    fill(
        GO_OPENAI,
        &[
            ("header", header.as_str()),
            ("base_url", loopback_base_url(port).as_str()),
            ("api_key", api_key),
            ("model", model_id),
        ],
    )
}

/**
 * \brief 生成命令行 (curl) 示例。
 */
pub fn curl_example(
    model_id: &str,
    protocol: Protocol,
    port: i64,
    api_key: &str,
    lang: &str,
) -> String {
    let locale = Locale::from_lang(lang);

    if protocol == Protocol::Anthropic {
        return fill(
            CURL_ANTHROPIC,
            &[
                ("note", ANTHROPIC_PROTOCOL_NOTE.comment("#", locale).as_str()),
                ("host", loopback_host(port).as_str()),
                ("anthropic_version", ANTHROPIC_VERSION),
                ("api_key", api_key),
                ("model", model_id),
            ],
        );
    }

    let header = match protocol {
        Protocol::Gemini => format!("{}\n", GEMINI_COMPAT_HTTP.comment("#", locale)),
        _ => String::new(),
    };
    fill(
        CURL_OPENAI,
        &[
            ("header", header.as_str()),
            ("base_url", loopback_base_url(port).as_str()),
            ("api_key", api_key),
            ("model", model_id),
        ],
    )
}

/**
 * \brief 生成 Rust 示例。
 * \details OpenAI 与 Gemini 均使用 async-openai 兼容模式；Anthropic 直接用 reqwest 调用 Messages API。
 */
pub fn rust_example(
    model_id: &str,
    protocol: Protocol,
    port: i64,
    api_key: &str,
    lang: &str,
) -> String {
    let locale = Locale::from_lang(lang);

    match protocol {
        Protocol::Anthropic => fill(
            RUST_ANTHROPIC,
            &[
                ("note", ANTHROPIC_PROTOCOL_NOTE.comment("//", locale).as_str()),
                ("no_sdk", RUST_NO_SDK.comment("//", locale).as_str()),
                ("host", loopback_host(port).as_str()),
                ("anthropic_version", ANTHROPIC_VERSION),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
        Protocol::OpenAI | Protocol::Gemini => fill(
            RUST_OPENAI,
            &[
                ("compat", RUST_COMPAT.comment("//", locale).as_str()),
                ("base_url", loopback_base_url(port).as_str()),
                ("api_key", api_key),
                ("model", model_id),
            ],
        ),
    }
}

/**
 * \brief 按目标语言分发到对应的示例生成函数。
 */
pub fn render(language: ClientLanguage, req: &SnippetRequest) -> String {
    let example: fn(&str, Protocol, i64, &str, &str) -> String = match language {
        ClientLanguage::Python => python_example,
        ClientLanguage::NodeJs => nodejs_example,
        ClientLanguage::Go => go_example,
        ClientLanguage::Curl => curl_example,
        ClientLanguage::Rust => rust_example,
    };
    example(&req.model_id, req.protocol, req.port, &req.api_key, req.lang())
}

/**
 * \brief 为所有目标语言生成示例，顺序与 `ClientLanguage::ALL` 一致。
 */
pub fn render_all(req: &SnippetRequest) -> Vec<(ClientLanguage, String)> {
    ClientLanguage::ALL
        .iter()
        .map(|lang| (*lang, render(*lang, req)))
        .collect()
}

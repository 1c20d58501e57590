use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use antigravity_snippets_core::{
    db,
    models::{base_request, ClientLanguage, Protocol, SnippetOverrides, DEFAULT_GATEWAY_PORT},
    server, snippets, telemetry,
};

/**
 * \brief CLI 程序入口：为本地网关生成多语言调用示例。
 */
#[derive(Parser, Debug)]
#[command(
    name = "ag-snippets",
    version,
    about = "Print client code examples for the local Antigravity gateway"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief 保存默认网关档案。
     * \param port     网关端口
     * \param api_key  网关 API Key
     * \param model    默认模型名
     * \param protocol 默认协议
     */
    Init {
        #[arg(long, default_value = "default")]
        name: String,
        #[arg(long, default_value_t = DEFAULT_GATEWAY_PORT)]
        port: i64,
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        model: String,
        #[arg(long, default_value = "openai")]
        protocol: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value_t = false)]
        enable_telemetry: bool,
    },

    /**
     * \brief 打印指定语言（或全部语言）的示例代码。
     */
    Show {
        /// python, nodejs, go, curl, rust or all
        #[arg(default_value = "all")]
        language: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long, value_parser = parse_protocol)]
        protocol: Option<Protocol>,
        #[arg(long, allow_negative_numbers = true)]
        port: Option<i64>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        lang: Option<String>,
    },

    /**
     * \brief 列出支持的客户端语言。
     */
    Languages,

    /**
     * \brief 启动本地 HTTP 服务。
     */
    Serve {
        #[arg(long, default_value = "127.0.0.1:5180")]
        addr: String,
    },
}

fn parse_protocol(tag: &str) -> Result<Protocol, std::convert::Infallible> {
    Ok(Protocol::parse(tag))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let conn = db::open_default_db().context("open database failed")?;
    db::migrate(&conn).context("apply migrations failed")?;
    let telemetry_enabled = db::get_telemetry_enabled(&conn).unwrap_or(false);
    telemetry::set_enabled(telemetry_enabled);

    match cli.command {
        Commands::Init {
            name,
            port,
            api_key,
            model,
            protocol,
            lang,
            enable_telemetry,
        } => {
            let protocol = Protocol::parse(&protocol);
            let profile_id =
                db::upsert_default_profile(&conn, &name, port, &api_key, &model, protocol)
                    .context("save profile failed")?;
            db::set_lang(&conn, &lang).context("save lang failed")?;
            db::set_telemetry_enabled(&conn, enable_telemetry).context("save telemetry failed")?;
            telemetry::set_enabled(enable_telemetry);
            println!(
                "Saved profile id={} (name={} | {} | port {} | {})",
                profile_id, name, protocol, port, model
            );
        }
        Commands::Show {
            language,
            model,
            protocol,
            port,
            api_key,
            lang,
        } => {
            let profile = db::get_default_profile(&conn).context("load profile failed")?;
            let stored_lang = db::get_lang(&conn).context("load lang failed")?;
            let overrides = SnippetOverrides {
                model,
                protocol,
                port,
                api_key,
                lang,
            };
            let req = overrides.apply(base_request(profile.as_ref(), Some(stored_lang)));

            if language.eq_ignore_ascii_case("all") {
                for (lang, code) in snippets::render_all(&req) {
                    println!("===== {} =====", lang.title());
                    println!("{}\n", code);
                }
            } else {
                let lang = language.parse::<ClientLanguage>()?;
                println!("{}", snippets::render(lang, &req));
            }

            telemetry::log_event(
                "cli.show",
                &format!(
                    "language={} protocol={} model={} port={}",
                    language, req.protocol, req.model_id, req.port
                ),
            );
        }
        Commands::Languages => {
            for lang in ClientLanguage::ALL {
                println!("{:<8} {}", lang.as_str(), lang.title());
            }
        }
        Commands::Serve { addr } => {
            server::run(&addr).await?;
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use question_forge::config::Config;
use question_forge::error::AppError;
use question_forge::models::ResolvedQuestion;
use question_forge::orchestrator::{App, ExamRequest, GenerationInput, GenerationOutcome};
use question_forge::services::answer_key::letter_for;
use question_forge::utils::logging;
use question_forge::workflow::SessionContext;

#[derive(Parser)]
#[command(name = "question_forge", version, about = "用大模型生成单选题，并从题库中组卷")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 根据主题或 PDF 生成题目
    Generate(GenerateArgs),
    /// 列出题库题目
    List {
        #[arg(long)]
        subject: Option<String>,
        /// 按题干过滤（不区分大小写）
        #[arg(long)]
        search: Option<String>,
    },
    /// 修改题目分值
    Marks { id: String, marks: u32 },
    /// 选题组卷
    Assemble(AssembleArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["topic", "pdf"])))]
struct GenerateArgs {
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    pdf: Option<PathBuf>,
    #[arg(long, default_value_t = 5)]
    count: usize,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    teacher: String,
    /// 默认分值，不填则使用配置
    #[arg(long)]
    marks: Option<u32>,
    /// 只预览，不写入题库
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct AssembleArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    teacher: String,
    /// 按顺序选中的题目ID，逗号分隔
    #[arg(long, value_delimiter = ',', required = true)]
    select: Vec<String>,
    /// 分值修改，格式 ID=分值，逗号分隔
    #[arg(long, value_delimiter = ',', value_parser = parse_marks)]
    marks: Vec<(String, u32)>,
    #[arg(long)]
    output: PathBuf,
}

fn parse_marks(s: &str) -> std::result::Result<(String, u32), String> {
    let (id, marks) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' 应为 ID=分值", s))?;
    let marks = marks
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("'{}' 分值无效: {}", s, e))?;
    Ok((id.trim().to_string(), marks))
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env（如果存在）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config);

    if let Err(e) = run(&app, cli.command).await {
        let kind = e
            .downcast_ref::<AppError>()
            .map(AppError::kind)
            .unwrap_or("other");
        error!(kind, "❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => {
            let input = match (args.topic, args.pdf) {
                (Some(topic), _) => GenerationInput::Topic(topic),
                (None, Some(pdf)) => GenerationInput::Pdf(pdf),
                (None, None) => unreachable!("clap 保证 --topic 或 --pdf 至少有一个"),
            };
            let marks = args.marks.unwrap_or(app.config().default_marks);
            let session = SessionContext::new(args.teacher, args.subject, marks)?;

            let outcome = app
                .generate(input, args.count, &session, args.dry_run)
                .await
                .context("生成题目失败")?;

            match outcome {
                GenerationOutcome::Previewed(preview) => {
                    for (i, question) in preview.questions.iter().enumerate() {
                        print_question(i + 1, question);
                    }
                }
                GenerationOutcome::Saved(report) => {
                    println!(
                        "✅ 已写入 {}/{} 道题目",
                        report.saved.len(),
                        report.requested
                    );
                    for question in &report.saved {
                        println!("  {}  {}", question.id, question);
                    }
                }
            }
        }
        Command::List { subject, search } => {
            let questions = app
                .list_questions(subject.as_deref(), search.as_deref())
                .await
                .context("读取题库失败")?;
            println!("共 {} 道题目", questions.len());
            for question in &questions {
                println!("  {}  {}", question.id, question);
            }
        }
        Command::Marks { id, marks } => {
            let question = app.update_marks(&id, marks).await.context("修改分值失败")?;
            println!("✅ {}  {}", question.id, question);
        }
        Command::Assemble(args) => {
            let paper = app
                .assemble_exam(ExamRequest {
                    title: args.title,
                    teacher_id: args.teacher,
                    subject_id: args.subject,
                    question_ids: args.select,
                    marks: args.marks,
                    output: args.output.clone(),
                })
                .await
                .context("组卷失败")?;
            println!(
                "✅ 试卷「{}」共 {} 题，总分 {}，已保存至 {}",
                paper.title,
                paper.entries.len(),
                paper.total_marks,
                args.output.display()
            );
        }
    }

    Ok(())
}

fn print_question(number: usize, question: &ResolvedQuestion) {
    println!("{}. {} [{}]", number, question.text, question.difficulty);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if i == question.correct_answer { "*" } else { " " };
        println!("  {} {}. {}", marker, letter_for(i).unwrap_or('?'), option);
    }
}

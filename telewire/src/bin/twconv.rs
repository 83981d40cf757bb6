use std::fmt::Debug;
use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace, Level};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use telewire::{
    attach::{to_wire, AttachmentSink},
    request::{decode_response, ApiError},
    *,
};


#[derive(Parser, Debug)]
#[command(
    name="twconv",
    version=telewire::config::VERSION,
    about="Utility to decode Telegram Bot API payloads and print them back normalized",
    arg_required_else_help(true),
)]
struct Cli {
    /// Turn verbose level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print any logging messages
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a JSON value as the given type and print it back as it would be sent
    Decode {
        /// the type of the value
        kind: Kind,

        /// a JSON representation of the value
        json: String,
    },

    /// Decode a response envelope and print its result
    Envelope {
        /// the raw JSON response returned by the server
        json: String,
    },

    /// List the wire tokens of an enum
    Tokens {
        /// the name of the enum
        name: EnumName,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Update,
    Message,
    MaybeInaccessibleMessage,
    MessageOrigin,
    ChatMember,
    ChatBoostSource,
    ReactionType,
    BackgroundFill,
    BotCommandScope,
    InputMedia,
    Timestamp,
    ChatId,
    Color,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EnumName {
    ChatType,
    ChatAction,
    MessageEntityType,
    UpdateType,
    ParseMode,
    DiceEmoji,
    PollType,
    StickerType,
    StickerFormat,
    MaskPoint,
}

fn normalize<T>(json: &str) -> Result<String>
where
    T: DeserializeOwned + Serialize + Debug,
{
    let value: T = serde_json::from_str(json)?;
    debug!("decoded: {:?}", &value);

    let mut sink = AttachmentSink::new();
    let wire = to_wire(&value, &mut sink)?;
    Ok(serde_json::to_string_pretty(&wire)?)
}

fn tokens<E: WireEnum>() -> String {
    format!("{} (unknown write policy: {:?})\n  {}", E::NAME, E::UNKNOWN_WRITE, E::tokens().join("\n  "))
}

fn init_tracing(verbose_level: u8) {
    // use an env filter with default level of WARN
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let tracing = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter);

    // flags given on the command-line override those from the environment
    match verbose_level {
        0 => tracing.init(),
        1 => tracing.with_max_level(Level::DEBUG).init(),
        _ => tracing.with_max_level(Level::TRACE).init(),
    };
}

pub fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if !cli.quiet {
        init_tracing(cli.verbose);
        trace!("{:?}", cli);
    }

    let Some(cmd) = cli.command else {
        bail!("No command given. You need to specify at least one");
    };

    match cmd {
        Commands::Decode { kind, json } => {
            let output = match kind {
                Kind::Update => normalize::<Update>(&json)?,
                Kind::Message => normalize::<Message>(&json)?,
                Kind::MaybeInaccessibleMessage => normalize::<MaybeInaccessibleMessage>(&json)?,
                Kind::MessageOrigin => normalize::<MessageOrigin>(&json)?,
                Kind::ChatMember => normalize::<ChatMember>(&json)?,
                Kind::ChatBoostSource => normalize::<ChatBoostSource>(&json)?,
                Kind::ReactionType => normalize::<ReactionType>(&json)?,
                Kind::BackgroundFill => normalize::<BackgroundFill>(&json)?,
                Kind::BotCommandScope => normalize::<BotCommandScope>(&json)?,
                Kind::InputMedia => normalize::<InputMedia>(&json)?,
                Kind::Timestamp => {
                    let ts: Timestamp = serde_json::from_str(&json)?;
                    ts.to_string()
                },
                Kind::ChatId => normalize::<ChatId>(&json)?,
                Kind::Color => {
                    let color: Color = serde_json::from_str(&json)?;
                    color.to_string()
                },
            };
            println!("{output}");
        },

        Commands::Envelope { json } => {
            match decode_response::<JsonValue>(json.as_bytes()) {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(ApiError::Request { error_code, description, retry_after, migrate_to_chat_id }) => {
                    let mut details = String::new();
                    if let Some(secs) = retry_after {
                        details += &format!(", retry after {secs}s");
                    }
                    if let Some(chat_id) = migrate_to_chat_id {
                        details += &format!(", migrated to chat {chat_id}");
                    }
                    bail!("server returned error {error_code}: {description}{details}");
                },
                Err(e) => return Err(e.into()),
            }
        },

        Commands::Tokens { name } => {
            let output = match name {
                EnumName::ChatType => tokens::<ChatType>(),
                EnumName::ChatAction => tokens::<ChatAction>(),
                EnumName::MessageEntityType => tokens::<MessageEntityType>(),
                EnumName::UpdateType => tokens::<UpdateType>(),
                EnumName::ParseMode => tokens::<ParseMode>(),
                EnumName::DiceEmoji => tokens::<DiceEmoji>(),
                EnumName::PollType => tokens::<PollType>(),
                EnumName::StickerType => tokens::<StickerType>(),
                EnumName::StickerFormat => tokens::<StickerFormat>(),
                EnumName::MaskPoint => tokens::<MaskPoint>(),
            };
            println!("{output}");
        },
    }

    Ok(())
}

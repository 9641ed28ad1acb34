use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use tempo_core::Context;
use tempo_utils::embed::notice_embed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help",
};

/// Render the command catalog grouped by category.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let embed = notice_embed("Available Commands", grouped_help_description(COMMANDS))?;

    ctx.http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .await?;

    Ok(())
}

fn grouped_help_description(commands: &[CommandMeta]) -> String {
    let mut categories: Vec<&str> = commands.iter().map(|command| command.category).collect();
    categories.sort_unstable();
    categories.dedup();

    let mut description = String::new();
    for category in categories {
        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&format!("**{category}**\n"));

        for command in commands.iter().filter(|command| command.category == category) {
            description.push_str(&format!("`{}` - {}\n", command.usage, command.desc));
        }
    }

    description
}

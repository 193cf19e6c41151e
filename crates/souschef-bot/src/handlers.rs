use std::sync::Arc;

use souschef_core::dialogue::{Dialogue, MessageEdit};
use souschef_core::llm::LlmService;
use souschef_core::storage::Storage;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::payloads::AnswerCallbackQuerySetters;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use teloxide::RequestError;

use crate::deliver::{edit_menu, edit_reply, send_reply};

pub type Engine = Dialogue<Storage, LlmService>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Sous-Chef AI commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "set your health information")]
    Health,
    #[command(description = "set dietary preferences and allergies")]
    Diet,
    #[command(description = "view your saved recipes")]
    MyRecipes,
    #[command(description = "clear all your saved preferences")]
    Clear,
    #[command(description = "view your current preferences")]
    Status,
}

/// Update routing: known commands, then plain text, then button presses.
/// Unknown `/commands` fall through to the dispatcher's default handler.
pub fn schema() -> UpdateHandler<RequestError> {
    let messages = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(|t| !t.starts_with('/')))
                .endpoint(text_handler),
        );

    dptree::entry()
        .branch(messages)
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}

fn sender(msg: &Message) -> Option<(i64, String)> {
    msg.from
        .as_ref()
        .map(|u| (u.id.0 as i64, u.first_name.clone()))
}

async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: Arc<Engine>,
) -> ResponseResult<()> {
    let Some((user, first_name)) = sender(&msg) else {
        return Ok(());
    };
    tracing::debug!(user, ?cmd, "command");

    let reply = match cmd {
        Command::Start => engine.start(user, &first_name).await,
        Command::Help => engine.help(),
        Command::Health => engine.health_menu(user).await,
        Command::Diet => engine.begin_diet_wizard(user).await,
        Command::MyRecipes => engine.my_recipes(user).await,
        Command::Clear => engine.clear(user).await,
        Command::Status => engine.status(user).await,
    };
    send_reply(&bot, msg.chat.id, &reply).await
}

async fn text_handler(bot: Bot, msg: Message, engine: Arc<Engine>) -> ResponseResult<()> {
    let (Some((user, _)), Some(text)) = (sender(&msg), msg.text()) else {
        return Ok(());
    };
    let chat = msg.chat.id;

    let notifier = bot.clone();
    let reply = engine
        .handle_text(user, text, move |phrase| async move {
            if let Err(e) = notifier.send_message(chat, phrase).await {
                tracing::warn!(user, "could not send progress message: {e}");
            }
        })
        .await;

    send_reply(&bot, chat, &reply).await
}

async fn callback_handler(bot: Bot, q: CallbackQuery, engine: Arc<Engine>) -> ResponseResult<()> {
    let user = q.from.id.0 as i64;
    let Some(payload) = q.data.as_deref() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let response = engine.handle_action(user, payload).await;

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(notice) = &response.notice {
        answer = answer.text(notice.text.clone()).show_alert(notice.alert);
    }
    answer.await?;

    let (Some(edit), Some(message)) = (&response.edit, &q.message) else {
        return Ok(());
    };
    let chat = message.chat().id;
    let id = message.id();

    match edit {
        MessageEdit::Replace(reply) => edit_reply(&bot, chat, id, reply).await,
        MessageEdit::Markup(menu) => edit_menu(&bot, chat, id, menu).await,
    }
}

//! Prompt templates

/// System and user message for one completion
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

pub fn challenge(context: &str, target_name: &str) -> Prompt {
    let context = non_empty(context, "General backchodi battle");
    let target = non_empty(target_name, "opponent");
    Prompt {
        system: "You are a witty backchodi master who creates hilarious friendly roasts in Hinglish style.",
        user: format!(
            "Generate a witty, humorous backchodi (friendly roast) in Hindi-English mix style.

Context: {context}
Target: {target}

Style guidelines:
- Mix of Hindi and English (Hinglish)
- Use popular slang like \"arre\", \"yaar\", \"bhai\"
- Keep it light and funny, not offensive
- Length: 15-80 characters
- Be creative and original

Generate only the backchodi message, nothing else."
        ),
    }
}

pub fn score(message: &str, ai_challenge: &str, context: &str) -> Prompt {
    let context = non_empty(context, "Backchodi battle");
    let challenge = if ai_challenge.trim().is_empty() {
        String::new()
    } else {
        format!("Responding to: \"{}\"\n", ai_challenge.trim())
    };
    Prompt {
        system: "You are an expert judge of Hinglish backchodi battles. Rate messages fairly based on humor, creativity, and style.",
        user: format!(
            "Evaluate this backchodi message on a scale of 1-10 based on these criteria:

Message: \"{message}\"
{challenge}Context: {context}

Scoring criteria:
1. Creativity and originality (1-3 points)
2. Humor and wit (1-3 points)
3. Use of Hinglish/slang (1-2 points)
4. Message flow and structure (1-2 points)

Provide:
1. A numerical score (1.0-10.0)
2. A brief feedback in Hinglish style (like \"Waah bhai, solid comeback!\" or \"Thoda weak tha yaar!\")

Format: SCORE|FEEDBACK
Example: 7.5|Ekdum mast! Good use of slang! 🔥"
        ),
    }
}

pub fn verdict(average_score: f64, player_name: &str) -> Prompt {
    let level = if average_score >= 7.0 {
        "outstanding"
    } else if average_score >= 5.0 {
        "decent"
    } else {
        "beginner"
    };
    let player = non_empty(player_name, "Player");
    Prompt {
        system: "You are an enthusiastic Hinglish game show host announcing final results of a backchodi battle.",
        user: format!(
            "Generate an exciting final verdict for a player who scored {average_score:.1}/10 in a backchodi battle.

Player name: {player}
Performance level: {level}

Style guidelines:
- Mix Hindi and English naturally
- Use excitement and energy
- Include appropriate emojis
- Keep it 8-15 words
- Make it feel like a game show announcement
- Use terms like \"backchod\", \"legend\", \"champion\" etc.

Generate only the verdict message with emojis, nothing else."
        ),
    }
}

pub fn winner_announcement(
    first_name: &str,
    first_score: f64,
    second_name: &str,
    second_score: f64,
) -> Prompt {
    let (result, outcome) = if first_score > second_score {
        ("clear winner", format!("Winner: {}", first_name))
    } else if second_score > first_score {
        ("clear winner", format!("Winner: {}", second_name))
    } else {
        ("tie", "It's a tie!".to_string())
    };
    Prompt {
        system: "You are an energetic Hinglish sports commentator announcing the winner of an epic backchodi battle.",
        user: format!(
            "Generate an exciting winner announcement for a backchodi duel battle.

Player 1: {first_name} (Score: {first_score:.1}/10)
Player 2: {second_name} (Score: {second_score:.1}/10)
Result: {result}
{outcome}

Style guidelines:
- Mix Hindi and English naturally
- Use sports commentary excitement
- Include appropriate emojis
- Keep it 5-12 words
- Make it feel like a championship announcement
- Use terms like \"champion\", \"winner\", \"epic battle\" etc.

Generate only the winner announcement with emojis, nothing else."
        ),
    }
}

pub fn waiting_message(context: &str) -> Prompt {
    let context = non_empty(context, "waiting");
    Prompt {
        system: "You are an energetic Hinglish game host creating engaging status messages for backchodi battles.",
        user: format!(
            "Generate a brief, energetic status message for a backchodi battle.

Context: {context}

Style guidelines:
- Mix Hindi and English naturally
- Use excitement and energy
- Include appropriate emojis
- Keep it 5-10 words max
- Make it feel encouraging and fun
- Use gaming/battle terminology

Generate only the status message with emojis, nothing else."
        ),
    }
}

fn non_empty<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

// Help command - show usage guide

pub fn help() -> String {
    "📚 Math Mastery - Help\n\
    IB Mathematics practice with progress tracking\n\
    \n\
    👤 Account\n\
    `signup <username> <email> <password> [course]` - Create an account\n\
    `signin <username|email> <password>` - Sign in\n\
    `signout` / `whoami [username]` - Your profile, or someone else's\n\
    \n\
    📝 Practice\n\
    `practice <topic> <difficulty> <paper>` - e.g. practice calculus standard 1\n\
    Topics: algebra, functions, geometry, stats, calculus\n\
    Difficulties: foundation, standard, distinction\n\
    `answer <working>` - Submit an answer to the current question\n\
    \n\
    📊 Statistics\n\
    `stats` - Your level, streak and achievements\n\
    `topics` - Topic breakdown and recent activity\n\
    `insights` - Strengths, weaknesses and goals\n\
    `reset-stats` - Clear the topic breakdown\n\
    \n\
    🏆 Community\n\
    `leaderboard [overall|questions|streak|score|level]`\n\
    `daily` - Who practised today\n\
    `rank` - Your position and the gap to your neighbours\n\
    `group create <public|private> <name> [| description]`\n\
    `group join|leave|board <group-id>` / `group list` / `group mine`\n\
    `group compete <group-id> <days> <name>` - Admins only\n\
    \n\
    🤖 Tutor\n\
    `ask <question>` - Study notes for derivatives, integrals, equations, sequences, probability and trig\n\
    `chat history` / `chat clear`\n\
    \n\
    🎓 Mock Exams\n\
    `exam start <paper> [minutes]` / `exam show <n>` / `exam answer <n> <working>`\n\
    `exam status` / `exam finish` / `exam history`\n\
    \n\
    `quit` - Leave"
        .to_string()
}

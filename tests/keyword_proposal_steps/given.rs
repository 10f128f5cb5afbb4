//! Given steps for keyword proposal BDD scenarios.

use super::world::{ProposalWorld, run_async};
use crate::test_helpers::InMemoryBot;
use rstest_bdd_macros::given;

#[given(r#"a team chat where "{first}" and "{second}" have introduced themselves"#)]
fn team_chat(world: &mut ProposalWorld, first: String, second: String) {
    for (id, name) in (1_i64..).zip([first, second]) {
        let member = InMemoryBot::member(id, &name);
        run_async(world.bot.say(&member, "/start"));
        world.members.insert(name, member);
    }
}

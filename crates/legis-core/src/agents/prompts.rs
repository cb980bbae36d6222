//! Prompt builders for every oracle call the chamber makes.

use crate::components::{Agency, Bill, PoliticianProfile};

use super::AgentContext;

const NONE: &str = "(none)";

const TURN_CONTRACT: &str = "\
Return STRICT JSON with keys:
speech (string), proposedAmendments (array of strings), stance (\"support\"|\"oppose\"|\"undecided\"),
voteIntent (\"YES\"|\"NO\"|\"ABSTAIN\"), confidence (number 0..1), reasons (array of strings),
targetsToLobby (array of strings). Arrays must contain only strings, not objects.
Keep speech 120-180 words. reasons must have 2-4 items, each 1-2 sentences.
proposedAmendments max 2 items. targetsToLobby max 2 items, using colleagues' full names.
When you use a fact, name its source and add a sentence of context.
When relevant, reference other representatives by name and their stated reasons.
No extra keys. No markdown.";

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        NONE
    } else {
        text.trim()
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join("; ")
    }
}

fn persona(profile: &PoliticianProfile) -> String {
    format!(
        "PERSONA:\n- Party: {}\n- Ideology: {}\n- Red lines: {}\n- Pet issues: {}\n- Speaking style: {}",
        or_none(&profile.party),
        profile.ideology_summary(),
        list_or_none(&profile.red_lines),
        list_or_none(&profile.pet_issues),
        or_none(&profile.speaking_style),
    )
}

fn shared_sections(ctx: &AgentContext<'_>, memory: &str) -> String {
    let peers = if ctx.peer_reasoning.is_empty() {
        NONE.to_string()
    } else {
        ctx.peer_reasoning.join("\n")
    };
    let messages = match ctx.direct_messages {
        Some(inbox) if !inbox.is_empty() => inbox
            .iter()
            .map(|(from, note)| format!("- {}: {}", from, note))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => NONE.to_string(),
    };
    format!(
        "BILL ONE-PAGER:\n{}\n\nFLOOR SUMMARY:\n{}\n\nYOUR MEMORY:\n{}\n\n\
         FACTS PACK (cite the source of any statistic you use):\n{}\n\n\
         PEER REASONING (recent statements by other representatives):\n{}\n\n\
         DIRECT MESSAGES (colleagues who lobbied you):\n{}\n\n\
         DEBATE TARGET (if present, respond directly with a rebuttal or support):\n{}",
        or_none(ctx.bill.briefing()),
        or_none(ctx.floor_summary),
        or_none(memory),
        or_none(ctx.facts_pack),
        peers,
        messages,
        ctx.debate_target.map(or_none).unwrap_or(NONE),
    )
}

pub fn politician_turn(
    name: &str,
    profile: &PoliticianProfile,
    ctx: &AgentContext<'_>,
    memory: &str,
) -> String {
    format!(
        "You are {}, a government representative.\n\n{}\n\n{}\n\n{}",
        name,
        persona(profile),
        shared_sections(ctx, memory),
        TURN_CONTRACT
    )
}

pub fn advocate_turn(
    name: &str,
    profile: &PoliticianProfile,
    ctx: &AgentContext<'_>,
    memory: &str,
) -> String {
    format!(
        "You are {}, the bill advocate on the primary floor. Explain the bill clearly, \
         highlight its strongest benefits and persuade others to support it.\n\n{}\n\n{}\n\n{}",
        name,
        persona(profile),
        shared_sections(ctx, memory),
        TURN_CONTRACT
    )
}

pub fn judge(bill: &Bill, agencies: &[Agency]) -> String {
    let agency_list = agencies
        .iter()
        .map(|a| format!("{}: {} (keywords: {})", a.id(), a.name(), a.scope_keywords().join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are the LLM Judge. Assign this bill to the best agency.\n\
         Evaluate every agency before choosing. Score each agency based on fit.\n\n\
         AGENCIES:\n{}\n\nBILL:\n{}\n\n\
         Return STRICT JSON:\n\
         {{\"selectedAgencyId\": \"...\", \"rationale\": \"...\", \"confidence\": 0.0, \
         \"scores\": {{\"agencyId\": 0.0}}}}\n\
         - scores must include every agency id listed above (0.0 to 1.0).\n\
         - selectedAgencyId must be the highest score.\n\
         - Use agency ids exactly as listed. No extra keys.",
        agency_list,
        bill.raw_text().trim()
    )
}

pub fn parse_bill(bill: &Bill) -> String {
    format!(
        "You are a legislative analyst. Read the bill and summarize it for busy legislators.\n\n\
         BILL TITLE: {}\n\nBILL TEXT:\n{}\n\n\
         Return STRICT JSON with keys:\n\
         topics (array of strings), estimatedCost (number, US dollars), \
         attributes (object of short string values), onePager (string, under 200 words).\n\
         No extra keys. No markdown.",
        bill.title(),
        bill.raw_text().trim()
    )
}

pub fn revise(agency: &Agency, bill: &Bill, committee_summary: &str, floor_summary: &str) -> String {
    format!(
        "You are the drafting staff of the {} ({}). The bill below failed its floor vote.\n\
         Redraft it so it can win a majority while keeping its purpose.\n\n\
         CURRENT ONE-PAGER:\n{}\n\nCOMMITTEE DISCUSSION:\n{}\n\nFLOOR DEBATE:\n{}\n\n\
         Return STRICT JSON with keys:\n\
         revisedBillText (string), revisionSummary (string), keyChanges (array of strings).\n\
         No extra keys. No markdown.",
        agency.name(),
        agency.id(),
        or_none(bill.briefing()),
        or_none(committee_summary),
        or_none(floor_summary)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Inbox;

    fn bill() -> Bill {
        Bill::new("hr-7", "Solar Grants", "Funds rooftop solar for schools.")
    }

    #[test]
    fn test_turn_prompt_sections() {
        let bill = bill();
        let mut inbox = Inbox::new();
        inbox.insert("Lee Chen".to_string(), "I'm support (vote YES).".to_string());
        let ctx = AgentContext {
            bill: &bill,
            floor_summary: "",
            facts_pack: "",
            peer_reasoning: vec!["Lee Chen (Energy): support because jobs"],
            debate_target: None,
            direct_messages: Some(&inbox),
        };
        let profile = PoliticianProfile {
            party: "Green".to_string(),
            ..Default::default()
        };
        let prompt = politician_turn("Ada Park", &profile, &ctx, "ROLLING_SUMMARY:\n(no turns yet)");

        assert!(prompt.starts_with("You are Ada Park, a government representative."));
        assert!(prompt.contains("- Party: Green"));
        assert!(prompt.contains("Funds rooftop solar for schools."));
        assert!(prompt.contains("FLOOR SUMMARY:\n(none)"));
        assert!(prompt.contains("Lee Chen (Energy): support because jobs"));
        assert!(prompt.contains("- Lee Chen: I'm support (vote YES)."));
        assert!(prompt.contains("DEBATE TARGET (if present, respond directly with a rebuttal or support):\n(none)"));
        assert!(prompt.ends_with("No extra keys. No markdown."));
    }

    #[test]
    fn test_judge_prompt_lists_agencies() {
        let agency = Agency::new(
            "energy",
            "Energy Committee",
            vec!["solar".to_string(), "grid".to_string()],
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap();
        let prompt = judge(&bill(), &[agency]);
        assert!(prompt.contains("energy: Energy Committee (keywords: solar, grid)"));
        assert!(prompt.contains("Funds rooftop solar for schools."));
    }
}

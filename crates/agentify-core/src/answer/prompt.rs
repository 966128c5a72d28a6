//! Fixed prompt template for the banking advisor

use super::Context;

const ADVISOR_PREAMBLE: &str = "\
You are a financial expert with a comprehensive understanding of various debit cards, credit cards, savings accounts, and current accounts. The Context will contain detailed information about different financial products from two banks: SBI and HDFC. The data will include:

Debit Cards:
- Card variants
- Annual fees and add-on card fees
- Transaction charges (ATM withdrawals, international transactions, POS transactions, etc.)
- Foreign exchange fees
- Replacement charges

Credit Cards:
- Card variants
- Annual and add-on fees
- Benefits and reward programs (e.g., cashbacks, reward points)
- Interest rates on unpaid balances
- Charges for international transactions, ATM withdrawals, and replacement
- Eligibility criteria, including income or credit score requirements

Savings Accounts:
- Account types (e.g., Basic Savings, Regular Savings)
- Interest rates on deposits
- Minimum balance requirements
- Charges for various services (e.g., cheque book issuance, account closure, stop payment)
- Transaction limits (e.g., IMPS, UPI, self-account transfers)
- Features such as video KYC, debit card type, account access, and notifications
- Eligibility criteria for account holders

Current Accounts:
- Account types (e.g., Ultima, Regular Current Accounts)
- Monthly or quarterly average balance requirements
- Features such as overdraft facilities, cheque books, and debit card types
- Charges for various services (e.g., cheque issuance, cash deposit limits)
- Transaction limits and access options (mobile banking, internet banking, ATM access)
- Eligibility criteria for businesses or individuals opening the account

Given this information, respond to the Question below by providing a detailed and optimized financial answer, specific to the user's query. If the question requires a comparison, provide a side-by-side analysis based on the features, fees, and benefits where applicable.

Context: ";

/// A template with exactly two slots: context, then question.
///
/// The template is split around its slots rather than searched for
/// placeholders, so slot values are never re-substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    head: &'static str,
    between: &'static str,
    tail: &'static str,
}

impl PromptTemplate {
    const fn new(head: &'static str, between: &'static str, tail: &'static str) -> Self {
        Self {
            head,
            between,
            tail,
        }
    }

    /// SBI and HDFC product advisor
    pub const fn financial_advisor() -> Self {
        Self::new(ADVISOR_PREAMBLE, "\nQuestion: ", "\n\nAnswer: ")
    }

    /// Length of the template text without slot values
    pub fn overhead(&self) -> usize {
        self.head.len() + self.between.len() + self.tail.len()
    }

    pub fn render(&self, context: &Context, question: &str) -> String {
        let mut prompt =
            String::with_capacity(self.overhead() + context.as_str().len() + question.len());
        prompt.push_str(self.head);
        prompt.push_str(context.as_str());
        prompt.push_str(self.between);
        prompt.push_str(question);
        prompt.push_str(self.tail);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::assemble;
    use crate::retrieval::RetrievedDocument;

    #[test]
    fn test_render_fills_both_slots() {
        let context = assemble(
            &[RetrievedDocument::from_index("Millennia: Rs 1000 fee", Some(0.9))],
            &["Freedom card waiver"],
        );
        let prompt = PromptTemplate::financial_advisor().render(&context, "Which card is free?");

        assert!(prompt.starts_with("You are a financial expert"));
        assert!(prompt.contains(
            "Context: Millennia: Rs 1000 fee\nFreedom card waiver\nQuestion: Which card is free?"
        ));
        assert!(prompt.ends_with("\n\nAnswer: "));
    }

    #[test]
    fn test_template_lists_product_categories() {
        let prompt = PromptTemplate::financial_advisor().render(&Context::default(), "q");
        let categories = [
            "Debit Cards:",
            "Credit Cards:",
            "Savings Accounts:",
            "Current Accounts:",
        ];
        for category in categories {
            assert_eq!(prompt.matches(category).count(), 1, "{}", category);
        }
    }

    #[test]
    fn test_empty_context_slot() {
        let template = PromptTemplate::financial_advisor();
        let prompt = template.render(&Context::default(), "Is there a zero balance account?");
        assert!(prompt.contains("Context: \nQuestion: Is there a zero balance account?"));
        assert_eq!(prompt.len(), template.overhead() + "Is there a zero balance account?".len());
    }

    #[test]
    fn test_slot_values_are_not_resubstituted() {
        let context = assemble(
            &[RetrievedDocument::from_index("literal {question} braces", None)],
            &[] as &[&str],
        );
        let prompt = PromptTemplate::financial_advisor().render(&context, "{context}");

        assert!(prompt.contains("Context: literal {question} braces\n"));
        assert!(prompt.contains("Question: {context}\n"));
    }

    #[test]
    fn test_template_is_stable() {
        let template = PromptTemplate::financial_advisor();
        let a = template.render(&Context::default(), "same");
        let b = template.render(&Context::default(), "same");
        assert_eq!(a, b);
    }
}

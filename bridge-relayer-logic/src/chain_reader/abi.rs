use alloy::sol;

use crate::types::BridgeMessage;

sol! {
    #[derive(Debug)]
    struct Message {
        uint256 id;
        address sender;
        uint256 srcChainId;
        uint256 destChainId;
        address owner;
        address to;
        address refundAddress;
        uint256 depositValue;
        uint256 callValue;
        uint256 processingFee;
        uint256 gasLimit;
        bytes data;
        string memo;
    }

    #[sol(rpc)]
    interface IBridge {
        #[derive(Debug)]
        event MessageSent(bytes32 indexed msgHash, Message message);

        function getMessageStatus(bytes32 msgHash) external view returns (uint8);
    }

    #[sol(rpc)]
    interface ITokenVault {
        #[derive(Debug)]
        event ERC20Sent(
            bytes32 indexed msgHash,
            address indexed from,
            address indexed to,
            uint256 destChainId,
            address token,
            uint256 amount
        );
    }

    #[sol(rpc)]
    interface IERC20 {
        function symbol() external view returns (string);
    }
}

impl From<Message> for BridgeMessage {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender: m.sender,
            src_chain_id: m.srcChainId,
            dest_chain_id: m.destChainId,
            owner: m.owner,
            to: m.to,
            refund_address: m.refundAddress,
            deposit_value: m.depositValue,
            call_value: m.callValue,
            processing_fee: m.processingFee,
            gas_limit: m.gasLimit,
            data: m.data,
            memo: m.memo,
        }
    }
}

impl From<&BridgeMessage> for Message {
    fn from(m: &BridgeMessage) -> Self {
        Self {
            id: m.id,
            sender: m.sender,
            srcChainId: m.src_chain_id,
            destChainId: m.dest_chain_id,
            owner: m.owner,
            to: m.to,
            refundAddress: m.refund_address,
            depositValue: m.deposit_value,
            callValue: m.call_value,
            processingFee: m.processing_fee,
            gasLimit: m.gas_limit,
            data: m.data.clone(),
            memo: m.memo.clone(),
        }
    }
}
